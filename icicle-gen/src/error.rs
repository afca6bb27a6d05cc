//! Error types for `icicle-gen`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Setup failures that stop `icicle-gen` before or between rounds.
///
/// Problems with individual fields or helpers are not errors here; they are
/// diagnostics reported by the processor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenError {
    /// Layered configuration could not be merged or extracted.
    #[error("invalid configuration: {0}")]
    Config(Box<figment::Error>),

    /// An explicitly requested configuration file does not exist.
    #[error("configuration file {0} not found")]
    MissingConfig(Utf8PathBuf),

    /// Filesystem access failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A manifest is not valid JSON or does not match the manifest schema.
    #[error("failed to parse manifest {path}: {source}")]
    Manifest {
        /// Manifest path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A manifest element names a malformed type.
    #[error("invalid element in manifest {path}: {source}")]
    Element {
        /// Manifest path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: icicle::IcicleError,
    },
}

impl From<figment::Error> for GenError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl GenError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
