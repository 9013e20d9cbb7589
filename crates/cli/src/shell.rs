//! Interactive read-eval-print loop and batch entry point.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use mendel_sim::session::{Reply, Session};

use crate::defaults::{BANNER, PROMPT};

/// Read commands from `input` until `/exit` or end of input.
///
/// Replies go to `output`; failed commands are printed and the loop goes on.
pub fn run_interactive<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
    quiet: bool,
) -> Result<()> {
    if !quiet {
        writeln!(output, "{BANNER}")?;
    }
    let mut lines = input.lines();
    loop {
        if !quiet {
            write!(output, "{PROMPT}")?;
            output.flush()?;
        }
        let Some(line) = lines.next() else {
            log::debug!("end of input");
            break;
        };
        let line = line.context("Failed to read command line")?;
        match session.process(&line) {
            Reply::Exit => break,
            Reply::Empty => {}
            reply => writeln!(output, "{reply}")?,
        }
    }
    if !quiet {
        writeln!(output, "Bye.")?;
    }
    Ok(())
}

/// Run one command file and print its report.
///
/// Fails if the file itself cannot be read; failing lines inside it only
/// show up in the report.
pub fn run_batch(session: &mut Session, path: &Path) -> Result<()> {
    let report = session
        .load_commands(path)
        .with_context(|| format!("Failed to run command file {}", path.display()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", report.render())?;
    Ok(())
}
