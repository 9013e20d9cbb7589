//! Base types for gene representation.
//!
//! This module provides the foundational types for representing genes,
//! their alleles, and the two-allele loci that make up a genotype.

mod gene;
mod locus;

pub use gene::{Gene, GeneRegistry};
pub(crate) use gene::upper;
pub use locus::{Locus, Zygosity};
