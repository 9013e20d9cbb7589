//! Genotype and phenotype frequency tables.

use std::collections::HashMap;

use crate::base::GeneRegistry;
use crate::errors::GenotypeError;
use crate::genome::Genotype;

/// Count and share of one exact genotype.
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeFrequency {
    pub genotype: String,
    pub count: usize,
    pub ratio: f64,
}

/// Count and share of one phenotype (trait tuple), with the distinct
/// genotypes that express it.
#[derive(Debug, Clone, PartialEq)]
pub struct PhenotypeFrequency {
    pub traits: Vec<String>,
    pub count: usize,
    pub ratio: f64,
    pub genotypes: Vec<String>,
}

impl PhenotypeFrequency {
    /// Trait tuple rendered as `(tall, round)`.
    pub fn label(&self) -> String {
        format!("({})", self.traits.join(", "))
    }
}

/// One row of the detailed listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub genotype: String,
    /// Trait labels joined by `", "`.
    pub traits: String,
    pub count: usize,
    pub ratio: f64,
}

/// Aggregated statistics of a population.
///
/// Genotype and phenotype tables keep first-seen order; `details` (only
/// filled on request) is sorted by descending count, ties kept in first-seen
/// order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statistics {
    pub total: usize,
    pub genotypes: Vec<GenotypeFrequency>,
    pub phenotypes: Vec<PhenotypeFrequency>,
    pub details: Vec<DetailRow>,
}

impl Statistics {
    pub fn compute(
        organisms: &[Genotype],
        registry: &GeneRegistry,
        with_details: bool,
    ) -> Result<Self, GenotypeError> {
        let total = organisms.len();

        let mut genotypes: Vec<GenotypeFrequency> = Vec::new();
        let mut genotype_traits: Vec<Vec<&str>> = Vec::new();
        let mut genotype_slot: HashMap<&Genotype, usize> = HashMap::new();

        for genotype in organisms {
            if let Some(&slot) = genotype_slot.get(genotype) {
                genotypes[slot].count += 1;
                continue;
            }
            genotype_slot.insert(genotype, genotypes.len());
            genotypes.push(GenotypeFrequency {
                genotype: genotype.to_string(),
                count: 1,
                ratio: 0.0,
            });
            genotype_traits.push(genotype.phenotype(registry)?);
        }

        let mut phenotypes: Vec<PhenotypeFrequency> = Vec::new();
        let mut phenotype_slot: HashMap<&[&str], usize> = HashMap::new();
        for (freq, traits) in genotypes.iter().zip(&genotype_traits) {
            let slot = *phenotype_slot.entry(traits.as_slice()).or_insert_with(|| {
                phenotypes.push(PhenotypeFrequency {
                    traits: traits.iter().map(|t| t.to_string()).collect(),
                    count: 0,
                    ratio: 0.0,
                    genotypes: Vec::new(),
                });
                phenotypes.len() - 1
            });
            phenotypes[slot].count += freq.count;
            phenotypes[slot].genotypes.push(freq.genotype.clone());
        }

        for freq in &mut genotypes {
            freq.ratio = ratio(freq.count, total);
        }
        for freq in &mut phenotypes {
            freq.ratio = ratio(freq.count, total);
        }

        let details = if with_details {
            let mut rows: Vec<DetailRow> = genotypes
                .iter()
                .zip(&genotype_traits)
                .map(|(freq, traits)| DetailRow {
                    genotype: freq.genotype.clone(),
                    traits: traits.join(", "),
                    count: freq.count,
                    ratio: freq.ratio,
                })
                .collect();
            rows.sort_by(|a, b| b.count.cmp(&a.count));
            rows
        } else {
            Vec::new()
        };

        Ok(Self {
            total,
            genotypes,
            phenotypes,
            details,
        })
    }

    pub fn genotype(&self, genotype: &str) -> Option<&GenotypeFrequency> {
        self.genotypes.iter().find(|f| f.genotype == genotype)
    }

    /// Genotype table by descending count (stable).
    pub fn genotypes_by_count(&self) -> Vec<&GenotypeFrequency> {
        let mut sorted: Vec<_> = self.genotypes.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    /// Phenotype table by descending count (stable).
    pub fn phenotypes_by_count(&self) -> Vec<&PhenotypeFrequency> {
        let mut sorted: Vec<_> = self.phenotypes.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }
}

#[inline]
fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
