//! Shared defaults for the command shell.

pub const PROMPT: &str = "mendel> ";

pub const BANNER: &str = "\
Mendel: a Mendelian inheritance simulator
Type /help for the command list, /exit to quit.";

/// Log filter used when `RUST_LOG` is not set.
pub const LOG_FILTER: &str = "warn";
