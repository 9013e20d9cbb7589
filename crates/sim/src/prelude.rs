//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use mendel_sim::prelude::*;
//!
//! let mut session = Session::new(SessionConfig::seeded(7));
//! session.process("/add A a tall short");
//! session.process("/create G");
//! session.process("/change G Aa add 4");
//! assert!(matches!(session.process("/run"), Reply::Output(_)));
//! assert_eq!(session.group("G").map(|g| g.size()), Some(2));
//! ```

pub use crate::base::{Gene, GeneRegistry, Locus, Zygosity};
pub use crate::errors::{self, CommandError, GeneError, GenotypeError, PopulationError};
pub use crate::genome::Genotype;
pub use crate::session::{BatchReport, Command, Reply, Session, SessionConfig};
pub use crate::simulation::{BreedRecord, MatingMode, Population, Statistics};
