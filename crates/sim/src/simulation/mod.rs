//! Populations, breeding and statistics.
//!
//! - `Population`: a named group of genotypes with a locked locus structure,
//!   a mating mode and its breeding history.
//! - `MatingMode`: how parents are paired (`random` or `cross`).
//! - `Statistics`: genotype and phenotype frequency tables.

pub mod breeding;
pub mod population;
pub mod statistics;

pub use breeding::{produce_child, select_pairs, BreedRecord, MatingMode};
pub use population::{Population, MAX_ORGANISMS};
pub use statistics::{DetailRow, GenotypeFrequency, PhenotypeFrequency, Statistics};
