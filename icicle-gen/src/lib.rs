//! Command-line host for the `icicle` generator.
//!
//! Reads one JSON manifest per processing round, feeds the rounds to an
//! [`icicle::IcicleProcessor`] and writes the generated helpers below an
//! output directory (or keeps them in memory for a dry run).

pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod output;
pub mod report;

use camino::Utf8PathBuf;
use icicle::{ArtifactSink, IcicleProcessor, MemorySink, ProcessorConfig, Round};
use tracing_subscriber::EnvFilter;

pub use crate::cli::Args;
pub use crate::config::GenConfig;
pub use crate::error::GenError;
use crate::manifest::Manifest;
use crate::output::DirSink;
pub use crate::report::{RoundSummary, RunSummary};

/// Installs the global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with
/// `verbose`. Calling this twice is harmless.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Loads the configuration and manifests for `args` and runs every round.
///
/// All manifests are read before the first round so a broken manifest
/// never leaves a partially generated tree behind.
///
/// # Errors
///
/// Returns [`GenError`] when configuration, a manifest or the output
/// directory cannot be loaded. Field and helper problems are diagnostics in
/// the returned summary instead.
pub fn run(args: &Args) -> Result<RunSummary, GenError> {
    let config = GenConfig::load(args)?;
    tracing::debug!(?config, "configuration loaded");
    let rounds = load_rounds(&args.manifests)?;

    if config.dry_run {
        let mut sink = MemorySink::new();
        let mut summary = process_rounds(&config.processor, rounds, &mut sink);
        summary.artifacts = sink.names().map(str::to_owned).collect();
        summary.dry_run = true;
        return Ok(summary);
    }
    let mut sink = DirSink::open(&config.out_dir)?;
    let mut summary = process_rounds(&config.processor, rounds, &mut sink);
    summary.artifacts = sink
        .created()
        .map(|path| sink.root().join(path).into_string())
        .collect();
    Ok(summary)
}

/// Reads `paths` as consecutive rounds; the last one is final.
///
/// # Errors
///
/// Returns the first manifest error encountered.
pub fn load_rounds(paths: &[Utf8PathBuf]) -> Result<Vec<(Utf8PathBuf, Round)>, GenError> {
    let last = paths.len().saturating_sub(1);
    paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let round = Manifest::load(path)?.into_round(path, index == last)?;
            tracing::debug!(manifest = %path, elements = round.elements().len(), "manifest loaded");
            Ok((path.clone(), round))
        })
        .collect()
}

/// Runs `rounds` through a fresh processor writing into `sink`.
pub fn process_rounds<S>(
    config: &ProcessorConfig,
    rounds: Vec<(Utf8PathBuf, Round)>,
    sink: &mut S,
) -> RunSummary
where
    S: ArtifactSink + ?Sized,
{
    let mut processor = IcicleProcessor::new(config.clone());
    let mut summary = RunSummary::default();
    for (manifest, round) in rounds {
        let report = processor.process(round, &mut *sink, &mut summary.diagnostics);
        summary.rounds.push(RoundSummary { manifest, report });
    }
    summary
}
