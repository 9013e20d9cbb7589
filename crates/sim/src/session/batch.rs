//! Batch execution of command files.

use std::fmt::Write;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::CommandError;
use crate::session::{Reply, Session};

/// Nested `/load` commands deeper than this are refused.
pub const MAX_LOAD_DEPTH: usize = 8;

/// Outcome of running one batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub path: PathBuf,
    /// Every line of the file, including blank and comment lines
    pub lines_scanned: usize,
    /// Lines handed to the command processor
    pub executed: usize,
    /// Line number and message of each failed line
    pub failures: Vec<(usize, String)>,
    /// Echoed lines and their output
    pub transcript: String,
}

impl BatchReport {
    pub fn render(&self) -> String {
        let mut out = format!("=== Running command file {} ===", self.path.display());
        if !self.transcript.is_empty() {
            out.push('\n');
            out.push_str(&self.transcript);
        }
        let _ = write!(
            out,
            "\n=== Finished {}: {} line(s) processed, {} executed, {} failed ===",
            self.path.display(),
            self.lines_scanned,
            self.executed,
            self.failures.len()
        );
        out
    }
}

/// Read the whole file as UTF-8. The handle is closed before any command runs.
pub(crate) fn read_source(path: &Path) -> Result<String, CommandError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CommandError::FileNotFound(path.to_path_buf()),
        _ => CommandError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let text = String::from_utf8(bytes).map_err(|_| CommandError::DecodeError(path.to_path_buf()))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Run every command line of `source` through `session`.
///
/// Failing lines are recorded and skipped; execution always continues with
/// the next line.
pub(crate) fn run_source(session: &mut Session, path: &Path, source: &str) -> BatchReport {
    let prefix = session.config().comment_prefix.clone();
    let echo = session.config().echo_batch_lines;

    let mut report = BatchReport {
        path: path.to_path_buf(),
        lines_scanned: 0,
        executed: 0,
        failures: Vec::new(),
        transcript: String::new(),
    };

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        report.lines_scanned = line_no;

        let line = raw.trim();
        if line.is_empty() || (!prefix.is_empty() && line.starts_with(prefix.as_str())) {
            continue;
        }

        report.executed += 1;
        if echo {
            push_line(&mut report.transcript, &format!("[line {line_no}] > {line}"));
        }

        match session.process(line) {
            Reply::Output(text) => push_line(&mut report.transcript, &text),
            Reply::Failed(message) => {
                log::warn!("{}:{line_no}: {message}", path.display());
                push_line(
                    &mut report.transcript,
                    &format!("!! line {line_no} failed: {message}"),
                );
                report.failures.push((line_no, message));
            }
            Reply::Exit => push_line(
                &mut report.transcript,
                &format!("line {line_no}: /exit ignored inside a command file"),
            ),
            Reply::Empty => {}
        }
    }
    report
}

fn push_line(out: &mut String, text: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(text);
}
