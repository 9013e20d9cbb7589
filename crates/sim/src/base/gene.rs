use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::base::Locus;
use crate::errors::{GeneError, GenotypeError};

/// A single gene with one dominant and one recessive allele.
///
/// The symbol is the uppercase form of the dominant argument and doubles as
/// the dominant allele; the recessive allele is stored in lowercase. Each
/// allele maps to a trait label used when computing phenotypes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    symbol: char,
    dominant: char,
    recessive: char,
    dominant_trait: String,
    recessive_trait: String,
}

impl Gene {
    /// Create a gene from its allele arguments and trait labels.
    ///
    /// Both allele arguments must be exactly one character with a
    /// single-character case mapping, the two alleles must differ, and the
    /// recessive allele must be the lowercase form of the symbol.
    pub fn new(
        dominant: &str,
        recessive: &str,
        dominant_trait: impl Into<String>,
        recessive_trait: impl Into<String>,
    ) -> Result<Self, GeneError> {
        let dom_raw = single_char(dominant).ok_or_else(|| {
            GeneError::InvalidGene(format!("dominant allele '{dominant}' must be one character"))
        })?;
        let rec_raw = single_char(recessive).ok_or_else(|| {
            GeneError::InvalidGene(format!("recessive allele '{recessive}' must be one character"))
        })?;
        if dom_raw == rec_raw {
            return Err(GeneError::InvalidGene(format!(
                "dominant and recessive alleles are both '{dom_raw}'"
            )));
        }

        let dominant = upper(dom_raw).ok_or_else(|| {
            GeneError::InvalidGene(format!("'{dom_raw}' has no single-character uppercase form"))
        })?;
        let recessive = lower(rec_raw).ok_or_else(|| {
            GeneError::InvalidGene(format!("'{rec_raw}' has no single-character lowercase form"))
        })?;
        if dominant == recessive {
            return Err(GeneError::InvalidGene(format!(
                "alleles '{dom_raw}' and '{rec_raw}' collapse to the same character"
            )));
        }
        if upper(recessive) != Some(dominant) {
            return Err(GeneError::InvalidGene(format!(
                "recessive allele '{rec_raw}' is not the lowercase form of '{dominant}'"
            )));
        }

        Ok(Self {
            symbol: dominant,
            dominant,
            recessive,
            dominant_trait: dominant_trait.into(),
            recessive_trait: recessive_trait.into(),
        })
    }

    #[inline]
    pub fn symbol(&self) -> char {
        self.symbol
    }

    #[inline]
    pub fn dominant(&self) -> char {
        self.dominant
    }

    #[inline]
    pub fn recessive(&self) -> char {
        self.recessive
    }

    pub fn dominant_trait(&self) -> &str {
        &self.dominant_trait
    }

    pub fn recessive_trait(&self) -> &str {
        &self.recessive_trait
    }

    /// The two characters allowed at a locus of this gene.
    #[inline]
    pub fn alleles(&self) -> [char; 2] {
        [self.dominant, self.recessive]
    }

    #[inline]
    pub fn is_allele(&self, c: char) -> bool {
        c == self.dominant || c == self.recessive
    }

    /// Trait expressed by `locus`: dominant whenever the dominant allele is
    /// present in either position.
    pub fn phenotype_of(&self, locus: Locus) -> &str {
        if locus.contains(self.dominant) {
            &self.dominant_trait
        } else {
            &self.recessive_trait
        }
    }
}

/// All genes known to a session, keyed by symbol.
///
/// Iteration follows symbol order so that random draws over the registry are
/// reproducible for a given seed.
#[derive(Debug, Clone, Default)]
pub struct GeneRegistry {
    genes: BTreeMap<char, Gene>,
}

impl GeneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new gene and return its symbol.
    pub fn define(
        &mut self,
        dominant: &str,
        recessive: &str,
        dominant_trait: &str,
        recessive_trait: &str,
    ) -> Result<char, GeneError> {
        let gene = Gene::new(dominant, recessive, dominant_trait, recessive_trait)?;
        let symbol = gene.symbol();
        if self.genes.contains_key(&symbol) {
            return Err(GeneError::DuplicateGene(symbol));
        }
        log::debug!("defined gene {symbol}");
        self.genes.insert(symbol, gene);
        Ok(symbol)
    }

    /// Remove a gene by symbol (case-insensitive).
    ///
    /// Callers are responsible for checking that no population still carries
    /// the gene.
    pub fn remove(&mut self, symbol: char) -> Result<Gene, GeneError> {
        let key = upper(symbol).unwrap_or(symbol);
        self.genes.remove(&key).ok_or(GeneError::UnknownGene(key))
    }

    pub fn get(&self, symbol: char) -> Option<&Gene> {
        self.genes.get(&symbol)
    }

    /// The gene named by the uppercase form of `allele`.
    pub fn gene_for_allele(&self, allele: char) -> Option<&Gene> {
        upper(allele).and_then(|s| self.genes.get(&s))
    }

    /// Resolve the gene of `locus` and return its expressed trait.
    pub fn phenotype_of(&self, locus: Locus) -> Result<&str, GenotypeError> {
        let gene = self
            .gene_for_allele(locus.first())
            .ok_or(GenotypeError::UnknownGene(upper(locus.first()).unwrap_or(locus.first())))?;
        Ok(gene.phenotype_of(locus))
    }

    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.genes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gene> {
        self.genes.values()
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Uppercase mapping, rejecting characters that expand (e.g. 'ß').
pub(crate) fn upper(c: char) -> Option<char> {
    let mut mapped = c.to_uppercase();
    let first = mapped.next()?;
    mapped.next().is_none().then_some(first)
}

fn lower(c: char) -> Option<char> {
    let mut mapped = c.to_lowercase();
    let first = mapped.next()?;
    mapped.next().is_none().then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_normalizes_case() {
        let gene = Gene::new("a", "A", "tall", "short").unwrap();
        assert_eq!(gene.symbol(), 'A');
        assert_eq!(gene.dominant(), 'A');
        assert_eq!(gene.recessive(), 'a');
    }

    #[test]
    fn test_gene_rejects_multi_char_alleles() {
        assert!(matches!(
            Gene::new("Aa", "a", "x", "y"),
            Err(GeneError::InvalidGene(_))
        ));
        assert!(matches!(
            Gene::new("A", "", "x", "y"),
            Err(GeneError::InvalidGene(_))
        ));
    }

    #[test]
    fn test_gene_rejects_identical_alleles() {
        assert!(matches!(
            Gene::new("A", "A", "x", "y"),
            Err(GeneError::InvalidGene(_))
        ));
        // Digits have no case, so they collapse onto each other.
        assert!(matches!(
            Gene::new("1", "1", "x", "y"),
            Err(GeneError::InvalidGene(_))
        ));
    }

    #[test]
    fn test_gene_rejects_unrelated_recessive() {
        assert!(matches!(
            Gene::new("A", "b", "tall", "short"),
            Err(GeneError::InvalidGene(_))
        ));
        assert!(matches!(
            Gene::new("1", "2", "x", "y"),
            Err(GeneError::InvalidGene(_))
        ));
        let gene = Gene::new("b", "B", "round", "wrinkled").unwrap();
        assert_eq!(gene.alleles(), ['B', 'b']);
    }

    #[test]
    fn test_every_allele_resolves_to_its_gene() {
        let mut registry = GeneRegistry::new();
        registry.define("y", "Y", "yellow", "green").unwrap();
        let gene = registry.get('Y').unwrap();
        for allele in gene.alleles() {
            assert_eq!(registry.gene_for_allele(allele).map(Gene::symbol), Some('Y'));
        }
    }

    #[test]
    fn test_phenotype_of_ignores_order() {
        let gene = Gene::new("A", "a", "高茎", "矮茎").unwrap();
        assert_eq!(gene.phenotype_of(Locus::new('A', 'A')), "高茎");
        assert_eq!(gene.phenotype_of(Locus::new('A', 'a')), "高茎");
        assert_eq!(gene.phenotype_of(Locus::new('a', 'A')), "高茎");
        assert_eq!(gene.phenotype_of(Locus::new('a', 'a')), "矮茎");
    }

    #[test]
    fn test_registry_define_and_duplicate() {
        let mut registry = GeneRegistry::new();
        assert_eq!(registry.define("A", "a", "tall", "short"), Ok('A'));
        assert_eq!(
            registry.define("a", "A", "x", "y"),
            Err(GeneError::DuplicateGene('A'))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_lookup_by_allele() {
        let mut registry = GeneRegistry::new();
        registry.define("B", "b", "round", "wrinkled").unwrap();
        assert_eq!(registry.gene_for_allele('b').map(Gene::symbol), Some('B'));
        assert!(registry.gene_for_allele('c').is_none());
        assert_eq!(registry.phenotype_of(Locus::new('b', 'b')), Ok("wrinkled"));
        assert_eq!(
            registry.phenotype_of(Locus::new('c', 'c')),
            Err(GenotypeError::UnknownGene('C'))
        );
    }

    #[test]
    fn test_registry_remove() {
        let mut registry = GeneRegistry::new();
        registry.define("A", "a", "tall", "short").unwrap();
        assert_eq!(registry.remove('a').map(|g| g.symbol()), Ok('A'));
        assert!(registry.is_empty());
        assert_eq!(registry.remove('A'), Err(GeneError::UnknownGene('A')));
    }

    #[test]
    fn test_registry_symbols_sorted() {
        let mut registry = GeneRegistry::new();
        registry.define("C", "c", "x", "y").unwrap();
        registry.define("A", "a", "x", "y").unwrap();
        assert_eq!(registry.symbols().collect::<Vec<_>>(), vec!['A', 'C']);
    }
}
