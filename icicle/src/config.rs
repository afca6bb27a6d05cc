//! Processor configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diagnostic::Severity;

/// Suffix appended to a declaring type's qualified name to name its helper.
pub const DEFAULT_SUFFIX: &str = "$$Icicle";

/// What the emission driver does with types it has already written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReemitPolicy {
    /// Write each helper once per process; later rounds skip it.
    #[default]
    Skip,
    /// Re-attempt every stored type each round and let the artifact sink
    /// reject duplicates.
    Attempt,
    /// Collect in every round but only emit when the host flags the final
    /// round.
    FinalRound,
}

impl ReemitPolicy {
    /// Kebab-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Attempt => "attempt",
            Self::FinalRound => "final-round",
        }
    }
}

impl fmt::Display for ReemitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReemitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Skip, Self::Attempt, Self::FinalRound]
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| format!("unknown re-emit policy '{s}'; expected skip, attempt or final-round"))
    }
}

/// Settings for an [`crate::IcicleProcessor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Helper name suffix.
    pub suffix: String,
    /// Handling of types already emitted in an earlier round.
    pub reemit: ReemitPolicy,
    /// Severity of rejected-modifier diagnostics.
    pub validation_severity: Severity,
    /// Severity of artifact creation or write failures.
    pub artifact_severity: Severity,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_owned(),
            reemit: ReemitPolicy::default(),
            validation_severity: Severity::Error,
            artifact_severity: Severity::Error,
        }
    }
}
