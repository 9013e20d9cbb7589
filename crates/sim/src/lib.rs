//! # Mendel Simulation Crate
//!
//! Core logic for simulating Mendelian inheritance: gene definitions,
//! diploid genotypes, named populations bred generation by generation, and
//! the line-oriented command session that drives them.

pub mod base;
pub mod errors;
pub mod genome;
pub mod prelude;
pub mod session;
pub mod simulation;

pub use base::{Gene, GeneRegistry, Locus};
pub use genome::Genotype;
pub use session::{Reply, Session, SessionConfig};
