//! Mating regimes and offspring production.
//!
//! Pairing works on organism indices so the parent generation is never
//! copied; offspring are assembled locus by locus from one random gamete per
//! parent, with loci drawn independently (no linkage).

use core::fmt;
use std::collections::HashMap;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::base::{upper, GeneRegistry, Locus};
use crate::errors::{GenotypeError, PopulationError};
use crate::genome::Genotype;

/// How parents are paired when a population breeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatingMode {
    /// Shuffle and pair neighbours; every pair yields one child.
    #[default]
    Random,
    /// Pair across genotype classes first, then within them.
    Cross,
}

impl MatingMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Cross => "cross",
        }
    }
}

impl fmt::Display for MatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatingMode {
    type Err = PopulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "cross" => Ok(Self::Cross),
            other => Err(PopulationError::InvalidMode(other.to_string())),
        }
    }
}

/// Summary of one breeding step, kept in the population history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedRecord {
    pub parent_count: usize,
    pub child_count: usize,
}

/// Select parent index pairs for `organisms` under `mode`.
///
/// Never returns more than `organisms.len() / 2` pairs.
pub fn select_pairs<R: Rng + ?Sized>(
    mode: MatingMode,
    organisms: &[Genotype],
    rng: &mut R,
) -> Vec<(usize, usize)> {
    match mode {
        MatingMode::Random => random_pairs(organisms.len(), rng),
        MatingMode::Cross => cross_pairs(organisms, rng),
    }
}

/// Shuffle all indices and pair (0,1), (2,3), ...; an odd leftover is dropped.
fn random_pairs<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    order
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

/// Pair organisms preferring distinct genotypes.
///
/// Organisms are grouped by exact genotype. Every unordered pair of distinct
/// groups contributes position-wise pairs up to the shorter group; each group
/// then pairs its own members two at a time. The combined list is shuffled
/// and truncated to `n / 2`.
fn cross_pairs<R: Rng + ?Sized>(organisms: &[Genotype], rng: &mut R) -> Vec<(usize, usize)> {
    let groups = group_indices(organisms);

    let mut pairs = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        for other in &groups[i + 1..] {
            pairs.extend(group.iter().copied().zip(other.iter().copied()));
        }
        pairs.extend(group.chunks_exact(2).map(|pair| (pair[0], pair[1])));
    }

    pairs.shuffle(rng);
    pairs.truncate(organisms.len() / 2);
    pairs
}

/// Indices of identical genotypes, groups in first-seen order.
fn group_indices(organisms: &[Genotype]) -> Vec<Vec<usize>> {
    let mut slot: HashMap<&Genotype, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (idx, genotype) in organisms.iter().enumerate() {
        let g = *slot.entry(genotype).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(idx);
    }
    groups
}

/// Produce one child from two parents.
///
/// For each locus one allele is drawn uniformly from each parent's pair; the
/// resulting locus is put in dominant-first order.
pub fn produce_child<R: Rng + ?Sized>(
    parent1: &Genotype,
    parent2: &Genotype,
    registry: &GeneRegistry,
    rng: &mut R,
) -> Result<Genotype, GenotypeError> {
    let loci = parent1
        .loci()
        .iter()
        .zip(parent2.loci())
        .map(|(&l1, &l2)| -> Result<Locus, GenotypeError> {
            let gene = registry
                .gene_for_allele(l1.first())
                .ok_or_else(|| GenotypeError::UnknownGene(upper(l1.first()).unwrap_or(l1.first())))?;
            let gamete1 = gamete(l1, rng);
            let gamete2 = gamete(l2, rng);
            Ok(Locus::new(gamete1, gamete2).canonical(gene))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Genotype::from_loci(loci))
}

#[inline]
fn gamete<R: Rng + ?Sized>(locus: Locus, rng: &mut R) -> char {
    locus.alleles()[rng.random_range(0..2)]
}
