//! Layering of defaults, `icicle.toml`, `ICICLE_*` variables and CLI flags.

use anyhow::{Result, ensure};
use camino::Utf8PathBuf;
use clap::Parser;
use icicle::{ReemitPolicy, Severity};
use icicle_gen::{Args, GenConfig, GenError};
use rstest::rstest;
use test_helpers::figment::in_jail;

fn args(extra: &[&str]) -> Result<Args> {
    let argv = ["icicle-gen"]
        .into_iter()
        .chain(extra.iter().copied())
        .chain(["round.json"]);
    Ok(Args::try_parse_from(argv)?)
}

fn load(extra: &[&str]) -> Result<GenConfig> {
    Ok(GenConfig::load(&args(extra)?)?)
}

#[rstest]
fn defaults_apply_without_file_or_environment() -> Result<()> {
    let config = in_jail(&[], |_| load(&[]))?;
    ensure!(config == GenConfig::default(), "{config:?}");
    ensure!(config.out_dir == "generated");
    Ok(())
}

#[rstest]
fn each_layer_overrides_the_one_below() -> Result<()> {
    let file = r#"
out_dir = "from-file"
dry_run = true

[processor]
suffix = "$$FileState"
reemit = "attempt"
validation_severity = "warning"
"#;
    let config = in_jail(&[("icicle.toml", file)], |jail| {
        jail.set_env("ICICLE_OUT_DIR", "from-env");
        jail.set_env("ICICLE_PROCESSOR__REEMIT", "final-round");
        load(&["--suffix", "$$CliState"])
    })?;
    ensure!(config.out_dir == "from-env", "{config:?}");
    ensure!(config.dry_run, "unset CLI flag must not clobber the file");
    ensure!(config.processor.suffix == "$$CliState");
    ensure!(config.processor.reemit == ReemitPolicy::FinalRound);
    ensure!(config.processor.validation_severity == Severity::Warning);
    ensure!(config.processor.artifact_severity == Severity::Error);
    Ok(())
}

#[rstest]
fn explicit_config_file_replaces_the_default_name() -> Result<()> {
    let config = in_jail(
        &[
            ("icicle.toml", "out_dir = \"ignored\""),
            ("custom.toml", "out_dir = \"custom\""),
        ],
        |_| load(&["--config", "custom.toml", "--reemit", "skip"]),
    )?;
    ensure!(config.out_dir == Utf8PathBuf::from("custom"), "{config:?}");
    ensure!(config.processor.reemit == ReemitPolicy::Skip);
    Ok(())
}

#[rstest]
fn missing_explicit_config_is_an_error() -> Result<()> {
    let outcome = in_jail(&[], |_| {
        let parsed = args(&["--config", "absent.toml"])?;
        Ok(GenConfig::load(&parsed))
    })?;
    ensure!(
        matches!(outcome, Err(GenError::MissingConfig(ref path)) if path == "absent.toml"),
        "{outcome:?}"
    );
    Ok(())
}

#[rstest]
#[case::bad_policy("[processor]\nreemit = \"sometimes\"\n")]
#[case::bad_severity("[processor]\nartifact_severity = \"fatal\"\n")]
#[case::bad_toml("out_dir = ")]
fn invalid_files_are_config_errors(#[case] file: &str) -> Result<()> {
    let outcome = in_jail(&[("icicle.toml", file)], |_| {
        let parsed = args(&[])?;
        Ok(GenConfig::load(&parsed))
    })?;
    ensure!(matches!(outcome, Err(GenError::Config(_))), "{outcome:?}");
    Ok(())
}
