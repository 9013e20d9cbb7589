//! Genotype representation and validation.

mod genotype;

pub use genotype::{validate, Genotype};
