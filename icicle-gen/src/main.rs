//! CLI entrypoint for `icicle-gen`.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use icicle_gen::{Args, GenError, RunSummary, report};

fn main() -> ExitCode {
    let args = Args::parse();
    icicle_gen::init_logging(args.verbose);
    match icicle_gen::run(&args).and_then(print) {
        Ok(summary) if summary.has_errors() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(2)
        }
    }
}

fn print(summary: RunSummary) -> Result<RunSummary, GenError> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    report::write_summary(&summary, &mut stdout.lock(), &mut stderr.lock())
        .map_err(|source| GenError::Io {
            path: "<stdout>".into(),
            source,
        })?;
    Ok(summary)
}
