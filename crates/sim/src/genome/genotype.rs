use core::fmt;

use crate::base::{upper, Gene, GeneRegistry, Locus};
use crate::errors::GenotypeError;

/// A validated genotype: an ordered sequence of loci, one per gene.
///
/// Genotypes are only built through [`validate`] (or by breeding, which
/// produces canonical loci by construction), so every locus belongs to a
/// registered gene and is written dominant-first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genotype {
    loci: Vec<Locus>,
}

impl Genotype {
    /// Parse and validate a genotype string against `registry`.
    pub fn parse(text: &str, registry: &GeneRegistry) -> Result<Self, GenotypeError> {
        validate(text, registry)
    }

    pub(crate) fn from_loci(loci: Vec<Locus>) -> Self {
        Self { loci }
    }

    pub fn loci(&self) -> &[Locus] {
        &self.loci
    }

    /// Number of loci (genes) in this genotype.
    pub fn locus_count(&self) -> usize {
        self.loci.len()
    }

    /// Length of the genotype string in characters.
    pub fn len(&self) -> usize {
        self.loci.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    /// Gene symbol of each locus, in order.
    pub fn gene_symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.loci
            .iter()
            .map(|locus| upper(locus.first()).unwrap_or(locus.first()))
    }

    /// True if any locus belongs to the gene `symbol`.
    pub fn carries(&self, symbol: char) -> bool {
        self.gene_symbols().any(|s| s == symbol)
    }

    /// Trait labels expressed by each locus, in locus order.
    pub fn phenotype<'r>(&self, registry: &'r GeneRegistry) -> Result<Vec<&'r str>, GenotypeError> {
        self.loci
            .iter()
            .map(|&locus| registry.phenotype_of(locus))
            .collect()
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for locus in &self.loci {
            write!(f, "{locus}")?;
        }
        Ok(())
    }
}

/// Check a raw genotype string against the registry's rules.
///
/// The string must have a positive even number of characters. Each
/// two-character locus must start with a character whose uppercase form names
/// a registered gene, contain only that gene's alleles, and list the dominant
/// allele first when heterozygous.
pub fn validate(text: &str, registry: &GeneRegistry) -> Result<Genotype, GenotypeError> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || chars.len() % 2 != 0 {
        return Err(GenotypeError::MalformedGenotype(text.to_string()));
    }

    let loci = chars
        .chunks(2)
        .filter_map(Locus::from_chunk)
        .map(|locus| validate_locus(locus, registry).map(|_| locus))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Genotype { loci })
}

fn validate_locus(locus: Locus, registry: &GeneRegistry) -> Result<&Gene, GenotypeError> {
    let first = locus.first();
    let symbol = upper(first).ok_or(GenotypeError::UnknownGene(first))?;
    let gene = registry
        .get(symbol)
        .ok_or(GenotypeError::UnknownGene(symbol))?;

    if !(gene.is_allele(locus.first()) && gene.is_allele(locus.second())) {
        return Err(GenotypeError::InvalidAllele {
            locus: locus.to_string(),
            symbol,
        });
    }
    if !locus.is_canonical(gene) {
        return Err(GenotypeError::BadAlleleOrder {
            locus: locus.to_string(),
            expected: locus.canonical(gene).to_string(),
        });
    }
    Ok(gene)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> GeneRegistry {
        let mut registry = GeneRegistry::new();
        registry.define("A", "a", "tall", "short").unwrap();
        registry.define("B", "b", "round", "wrinkled").unwrap();
        registry
    }

    #[test]
    fn test_validate_accepts_canonical() {
        let registry = registry();
        for text in ["AA", "Aa", "aa", "AaBb", "aabb", "BbAA"] {
            let genotype = validate(text, &registry).unwrap();
            assert_eq!(genotype.to_string(), text);
        }
    }

    #[test]
    fn test_validate_rejects_odd_and_empty() {
        let registry = registry();
        assert_eq!(
            validate("AaB", &registry),
            Err(GenotypeError::MalformedGenotype("AaB".into()))
        );
        assert_eq!(
            validate("", &registry),
            Err(GenotypeError::MalformedGenotype(String::new()))
        );
    }

    #[test]
    fn test_validate_unknown_gene() {
        let registry = registry();
        assert_eq!(validate("Cc", &registry), Err(GenotypeError::UnknownGene('C')));
        assert_eq!(validate("AAcc", &registry), Err(GenotypeError::UnknownGene('C')));
    }

    #[test]
    fn test_validate_invalid_allele() {
        let registry = registry();
        assert_eq!(
            validate("Ab", &registry),
            Err(GenotypeError::InvalidAllele {
                locus: "Ab".into(),
                symbol: 'A'
            })
        );
    }

    #[test]
    fn test_validate_bad_order() {
        let registry = registry();
        assert_eq!(
            validate("AAbB", &registry),
            Err(GenotypeError::BadAlleleOrder {
                locus: "bB".into(),
                expected: "Bb".into()
            })
        );
    }

    #[test]
    fn test_genotype_accessors() {
        let registry = registry();
        let genotype = Genotype::parse("AaBb", &registry).unwrap();
        assert_eq!(genotype.len(), 4);
        assert_eq!(genotype.locus_count(), 2);
        assert_eq!(genotype.gene_symbols().collect::<Vec<_>>(), vec!['A', 'B']);
        assert!(genotype.carries('B'));
        assert!(!genotype.carries('C'));
        assert_eq!(genotype.phenotype(&registry).unwrap(), vec!["tall", "round"]);
    }

    #[test]
    fn test_recessive_phenotype() {
        let registry = registry();
        let genotype = Genotype::parse("aabb", &registry).unwrap();
        assert_eq!(genotype.phenotype(&registry).unwrap(), vec!["short", "wrinkled"]);
    }
}
