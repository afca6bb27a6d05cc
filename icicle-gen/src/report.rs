//! Rendering of run results for the terminal.

use std::io::{self, Write};

use camino::Utf8PathBuf;
use icicle::{Diagnostic, RoundReport};

/// Outcome of one manifest's round.
#[derive(Debug, Clone)]
pub struct RoundSummary {
    /// Manifest the round was read from.
    pub manifest: Utf8PathBuf,
    /// Processor report for the round.
    pub report: RoundReport,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Rounds in processing order.
    pub rounds: Vec<RoundSummary>,
    /// Every diagnostic reported, in order.
    pub diagnostics: Vec<Diagnostic>,
    /// Generated artifacts: file paths, or artifact names in a dry run.
    pub artifacts: Vec<String>,
    /// Whether anything was written to disk.
    pub dry_run: bool,
}

impl RunSummary {
    /// Number of error diagnostics across all rounds.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.rounds.iter().map(|round| round.report.errors).sum()
    }

    /// Whether the run should exit unsuccessfully.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }
}

/// One-line description of a round.
#[must_use]
pub fn round_line(round: &RoundSummary) -> String {
    let report = &round.report;
    format!(
        "round {} ({}): {} candidates, {} rejected, {} unresolved; {} written, {} skipped, {} failed",
        report.round,
        round.manifest,
        report.candidates,
        report.rejected,
        report.build.unresolved,
        report.emission.written(),
        report.emission.skipped(),
        report.emission.failed(),
    )
}

/// Writes diagnostics to `diagnostics` and per-round summaries to `out`.
///
/// # Errors
///
/// Returns any error raised by the writers.
pub fn write_summary(
    summary: &RunSummary,
    out: &mut dyn Write,
    diagnostics: &mut dyn Write,
) -> io::Result<()> {
    for diagnostic in &summary.diagnostics {
        writeln!(diagnostics, "{diagnostic}")?;
    }
    for round in &summary.rounds {
        writeln!(out, "{}", round_line(round))?;
    }
    let verb = if summary.dry_run { "would write" } else { "wrote" };
    for artifact in &summary.artifacts {
        writeln!(out, "{verb} {artifact}")?;
    }
    Ok(())
}
