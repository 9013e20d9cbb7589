use core::fmt;

use crate::base::Gene;

/// The two alleles a diploid organism carries at one gene position.
///
/// A `Locus` is just a pair of characters; whether it is valid (and which
/// order is canonical) depends on the [`Gene`] it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locus {
    first: char,
    second: char,
}

/// Whether both alleles of a locus share the same identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zygosity {
    Homozygous,
    Heterozygous,
}

impl Locus {
    #[inline]
    pub const fn new(first: char, second: char) -> Self {
        Self { first, second }
    }

    /// Build a locus from a two-element chunk of a genotype.
    ///
    /// Returns `None` unless `chunk` holds exactly two characters.
    pub fn from_chunk(chunk: &[char]) -> Option<Self> {
        match chunk {
            [a, b] => Some(Self::new(*a, *b)),
            _ => None,
        }
    }

    #[inline]
    pub const fn first(self) -> char {
        self.first
    }

    #[inline]
    pub const fn second(self) -> char {
        self.second
    }

    #[inline]
    pub const fn alleles(self) -> [char; 2] {
        [self.first, self.second]
    }

    #[inline]
    pub fn contains(self, allele: char) -> bool {
        self.first == allele || self.second == allele
    }

    pub fn zygosity(self) -> Zygosity {
        if self.first == self.second {
            Zygosity::Homozygous
        } else {
            Zygosity::Heterozygous
        }
    }

    /// Reorder so the dominant allele of `gene` comes first.
    ///
    /// Homozygous loci and loci already in dominant-first order are returned
    /// unchanged, so the operation is idempotent.
    pub fn canonical(self, gene: &Gene) -> Self {
        if self.second == gene.dominant() && self.first != gene.dominant() {
            Self::new(self.second, self.first)
        } else {
            self
        }
    }

    /// True when the locus is written in the order `canonical` would produce.
    pub fn is_canonical(self, gene: &Gene) -> bool {
        self.canonical(gene) == self
    }

    /// Append both alleles to `out`.
    pub fn push_to(self, out: &mut String) {
        out.push(self.first);
        out.push(self.second);
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first, self.second)
    }
}
