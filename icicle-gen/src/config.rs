//! Layered configuration for `icicle-gen`.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, `ICICLE_*`
//! environment variables and finally command-line flags. Nested keys in the
//! environment use `__`, so `ICICLE_PROCESSOR__REEMIT=attempt` sets
//! `processor.reemit`.

use camino::Utf8PathBuf;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use icicle::{ProcessorConfig, ReemitPolicy};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::error::GenError;

/// File read from the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "icicle.toml";

/// Prefix of environment variables considered by the loader.
pub const ENV_PREFIX: &str = "ICICLE_";

/// Settings of one `icicle-gen` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Root of the generated source tree.
    pub out_dir: Utf8PathBuf,
    /// Process rounds without touching the filesystem.
    pub dry_run: bool,
    /// Settings forwarded to the processor.
    pub processor: ProcessorConfig,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            out_dir: Utf8PathBuf::from("generated"),
            dry_run: false,
            processor: ProcessorConfig::default(),
        }
    }
}

impl GenConfig {
    /// Loads the configuration for `args`.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::MissingConfig`] when `--config` names a missing
    /// file and [`GenError::Config`] when any layer fails to parse.
    pub fn load(args: &Args) -> Result<Self, GenError> {
        Ok(Self::figment(args)?.extract()?)
    }

    /// Builds the layered [`Figment`] without extracting it.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::MissingConfig`] when `--config` names a missing
    /// file.
    pub fn figment(args: &Args) -> Result<Figment, GenError> {
        let defaults = Figment::from(Serialized::defaults(Self::default()));
        let with_file = match &args.config {
            Some(path) if !path.is_file() => return Err(GenError::MissingConfig(path.clone())),
            Some(path) => defaults.merge(Toml::file(path.as_std_path())),
            None => defaults.merge(Toml::file(CONFIG_FILE)),
        };
        Ok(with_file
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(CliOverrides::from(args))))
    }
}

// Only flags the user actually passed may shadow lower layers, so unset
// options are dropped from the serialized form.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    out_dir: Option<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dry_run: Option<bool>,
    #[serde(skip_serializing_if = "ProcessorOverrides::is_empty")]
    processor: ProcessorOverrides,
}

#[derive(Debug, Default, Serialize)]
struct ProcessorOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reemit: Option<ReemitPolicy>,
}

impl ProcessorOverrides {
    const fn is_empty(&self) -> bool {
        self.suffix.is_none() && self.reemit.is_none()
    }
}

impl From<&Args> for CliOverrides {
    fn from(args: &Args) -> Self {
        Self {
            out_dir: args.out_dir.clone(),
            dry_run: args.dry_run.then_some(true),
            processor: ProcessorOverrides {
                suffix: args.suffix.clone(),
                reemit: args.reemit,
            },
        }
    }
}
