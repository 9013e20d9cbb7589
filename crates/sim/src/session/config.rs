//! Session configuration.

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Settings for a command session.
///
/// Can be deserialized from a JSON file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Optional RNG seed for reproducibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Lines of a batch file starting with this prefix are skipped
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: String,
    /// Echo each executed batch line before its output
    #[serde(default = "default_echo")]
    pub echo_batch_lines: bool,
}

fn default_comment_prefix() -> String {
    "#".to_string()
}

fn default_echo() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            comment_prefix: default_comment_prefix(),
            echo_batch_lines: default_echo(),
        }
    }
}

impl SessionConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build the session generator: seeded if configured, otherwise from OS
    /// entropy.
    pub fn make_rng(&self) -> Xoshiro256PlusPlus {
        match self.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
        }
    }
}
