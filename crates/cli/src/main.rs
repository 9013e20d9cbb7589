mod defaults;
mod shell;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;

use mendel_sim::session::{Session, SessionConfig};

/// Mendel: a Mendelian Inheritance Simulator
///
/// Define genes, build named groups of diploid organisms and breed them
/// generation by generation. Commands are read from stdin, or from a file
/// with `--load`.
#[derive(Parser, Debug)]
#[command(name = "mendel")]
#[command(author, version, about = "Simulates Mendelian inheritance in named populations", long_about = None)]
struct Cli {
    /// Random seed for reproducible runs (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON session configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a command file, print its report and exit
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Suppress the banner and prompt
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(defaults::LOG_FILTER))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    log::info!("starting session (seed: {:?})", config.seed);

    let mut session = Session::new(config);
    match &cli.load {
        Some(path) => shell::run_batch(&mut session, path)?,
        None => {
            let stdin = io::stdin();
            shell::run_interactive(&mut session, stdin.lock(), io::stdout(), cli.quiet)?;
        }
    }

    Ok(())
}
