//! Error type for the generation core.

use thiserror::Error;

use crate::command::ResolutionError;

/// Errors produced while building the source model or writing helpers.
///
/// Inside a round these never escape [`crate::IcicleProcessor::process`];
/// they are rendered into diagnostics instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IcicleError {
    /// A type or declaring-type name could not be parsed.
    #[error("invalid type '{input}': {reason}")]
    TypeSyntax {
        /// Text that failed to parse.
        input: String,
        /// What the parser expected.
        reason: String,
    },

    /// The type resolver could not classify a field's type.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Creating or writing a generated artifact failed.
    #[error("impossible to create {artifact}: {source}")]
    Artifact {
        /// Name of the artifact being generated.
        artifact: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl IcicleError {
    pub(crate) fn type_syntax(input: &str, reason: impl Into<String>) -> Self {
        Self::TypeSyntax {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }
}
