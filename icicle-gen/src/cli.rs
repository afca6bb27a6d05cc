//! Command-line interface definitions for `icicle-gen`.

use camino::Utf8PathBuf;
use clap::Parser;
use icicle::ReemitPolicy;

/// Parsed CLI arguments for `icicle-gen`.
#[derive(Debug, Clone, Parser)]
#[command(name = "icicle-gen")]
#[command(about = "Generate state save/restore helpers from round manifests")]
#[command(version)]
pub struct Args {
    /// Configuration file to use instead of `./icicle.toml`.
    #[arg(long, value_name = "path")]
    pub config: Option<Utf8PathBuf>,
    /// Directory receiving generated sources.
    #[arg(long, value_name = "path")]
    pub out_dir: Option<Utf8PathBuf>,
    /// Suffix appended to each declaring type's name.
    #[arg(long, value_name = "suffix")]
    pub suffix: Option<String>,
    /// Handling of types already emitted in an earlier round
    /// (`skip`, `attempt` or `final-round`).
    #[arg(long, value_name = "policy")]
    pub reemit: Option<ReemitPolicy>,
    /// Run every round without writing any file.
    #[arg(long)]
    pub dry_run: bool,
    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
    /// Round manifests, processed in order; the last is the final round.
    #[arg(required = true, value_name = "manifest")]
    pub manifests: Vec<Utf8PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_policy_names() -> Result<(), clap::Error> {
        let args = Args::try_parse_from(["icicle-gen", "--reemit", "final-round", "a.json"])?;
        assert_eq!(args.reemit, Some(ReemitPolicy::FinalRound));
        assert_eq!(args.manifests, vec![Utf8PathBuf::from("a.json")]);
        Ok(())
    }

    #[test]
    fn requires_a_manifest() {
        assert!(Args::try_parse_from(["icicle-gen"]).is_err());
    }
}
