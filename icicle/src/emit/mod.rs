//! Helper emission: naming, collaborator traits and the per-type driver.

pub mod java;

use std::io::{self, Write};

use crate::diagnostic::{Diagnostic, DiagnosticSink, Severity, Subject};
use crate::error::IcicleError;
use crate::field::FieldSet;
use crate::model::DeclaringType;

/// Names of the helper generated for one declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HelperName {
    artifact: String,
    class_name: String,
}

impl HelperName {
    /// Derives the helper names for `declaring` with `suffix`.
    ///
    /// ```
    /// use icicle::{DeclaringType, HelperName};
    ///
    /// let helper = HelperName::for_type(&DeclaringType::new("a.b", "Outer.Inner"), "$$Icicle");
    /// assert_eq!(helper.artifact(), "a.b.Outer.Inner$$Icicle");
    /// assert_eq!(helper.class_name(), "Outer$Inner$$Icicle");
    /// ```
    #[must_use]
    pub fn for_type(declaring: &DeclaringType, suffix: &str) -> Self {
        Self {
            artifact: format!("{}{suffix}", declaring.qualified_name()),
            class_name: format!("{}{suffix}", declaring.name().replace('.', "$")),
        }
    }

    /// Artifact name: the qualified declaring type followed by the suffix.
    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Top-level class name of the helper inside its package.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}

/// Writes the body of a helper.
pub trait Emitter {
    /// Writes a complete helper for `declaring` to `out`.
    ///
    /// The helper saves every record of `fields` into a state container under
    /// the record's key and restores it from there.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by `out`.
    fn emit(
        &self,
        declaring: &DeclaringType,
        helper: &HelperName,
        fields: &FieldSet,
        out: &mut dyn Write,
    ) -> io::Result<()>;
}

/// Creates brand-new generated artifacts.
pub trait ArtifactSink {
    /// Opens a write channel for `helper`, anchored to `anchor`.
    ///
    /// # Errors
    ///
    /// Fails with [`io::ErrorKind::AlreadyExists`] when the artifact was
    /// already created by this process, or with any error of the underlying
    /// storage.
    fn create(
        &mut self,
        helper: &HelperName,
        anchor: &DeclaringType,
    ) -> io::Result<Box<dyn Write + '_>>;
}

/// Result of one declaring type's emission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmissionOutcome {
    /// The helper was written.
    Written {
        /// Artifact name.
        artifact: String,
        /// Number of records in the helper.
        fields: usize,
    },
    /// The helper was written in an earlier round and left alone.
    Skipped {
        /// Artifact name.
        artifact: String,
    },
    /// Creating or writing the helper failed.
    Failed {
        /// Artifact name.
        artifact: String,
        /// Description of the failure.
        reason: String,
    },
}

impl EmissionOutcome {
    /// Artifact the outcome refers to.
    #[must_use]
    pub fn artifact(&self) -> &str {
        match self {
            Self::Written { artifact, .. }
            | Self::Skipped { artifact }
            | Self::Failed { artifact, .. } => artifact,
        }
    }
}

/// Outcomes of every declaring type visited in one emission pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmissionReport {
    outcomes: Vec<(DeclaringType, EmissionOutcome)>,
}

impl EmissionReport {
    /// Appends the outcome for `declaring`.
    pub fn push(&mut self, declaring: DeclaringType, outcome: EmissionOutcome) {
        self.outcomes.push((declaring, outcome));
    }

    /// Iterates outcomes in visiting order.
    pub fn iter(&self) -> impl Iterator<Item = (&DeclaringType, &EmissionOutcome)> {
        self.outcomes.iter().map(|(ty, outcome)| (ty, outcome))
    }

    /// Outcome recorded for `declaring`, if it was visited.
    #[must_use]
    pub fn outcome(&self, declaring: &DeclaringType) -> Option<&EmissionOutcome> {
        self.iter()
            .find(|(ty, _)| *ty == declaring)
            .map(|(_, outcome)| outcome)
    }

    /// Number of helpers written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.count(|outcome| matches!(outcome, EmissionOutcome::Written { .. }))
    }

    /// Number of types skipped because their helper already exists.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, EmissionOutcome::Skipped { .. }))
    }

    /// Number of failed emissions.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, EmissionOutcome::Failed { .. }))
    }

    /// Reports whether no type was visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn count(&self, predicate: impl Fn(&EmissionOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .count()
    }
}

/// Writes one helper per declaring type through an [`ArtifactSink`].
#[derive(Debug)]
pub struct EmissionDriver<'a, E: ?Sized> {
    emitter: &'a E,
    suffix: &'a str,
    severity: Severity,
}

impl<'a, E: Emitter + ?Sized> EmissionDriver<'a, E> {
    /// Creates a driver naming helpers with `suffix` and reporting failures
    /// at `severity`.
    #[must_use]
    pub const fn new(emitter: &'a E, suffix: &'a str, severity: Severity) -> Self {
        Self {
            emitter,
            suffix,
            severity,
        }
    }

    /// Helper names this driver uses for `declaring`.
    #[must_use]
    pub fn helper_name(&self, declaring: &DeclaringType) -> HelperName {
        HelperName::for_type(declaring, self.suffix)
    }

    /// Creates and writes the helper for `declaring`.
    ///
    /// # Errors
    ///
    /// Returns [`IcicleError::Artifact`] when the sink refuses the artifact
    /// or writing fails.
    pub fn write_helper<S>(
        &self,
        declaring: &DeclaringType,
        fields: &FieldSet,
        sink: &mut S,
    ) -> Result<HelperName, IcicleError>
    where
        S: ArtifactSink + ?Sized,
    {
        let helper = self.helper_name(declaring);
        let artifact_error = |source| IcicleError::Artifact {
            artifact: helper.artifact().to_owned(),
            source,
        };
        let mut out = sink.create(&helper, declaring).map_err(artifact_error)?;
        self.emitter
            .emit(declaring, &helper, fields, &mut out)
            .and_then(|()| out.flush())
            .map_err(artifact_error)?;
        drop(out);
        Ok(helper)
    }

    /// Emits `declaring`, turning any failure into a diagnostic.
    pub fn emit<S, D>(
        &self,
        declaring: &DeclaringType,
        fields: &FieldSet,
        sink: &mut S,
        diagnostics: &mut D,
    ) -> EmissionOutcome
    where
        S: ArtifactSink + ?Sized,
        D: DiagnosticSink + ?Sized,
    {
        match self.write_helper(declaring, fields, sink) {
            Ok(helper) => {
                tracing::debug!(artifact = helper.artifact(), fields = fields.len(), "helper written");
                EmissionOutcome::Written {
                    artifact: helper.artifact().to_owned(),
                    fields: fields.len(),
                }
            }
            Err(err) => {
                let reason = err.to_string();
                diagnostics.report(Diagnostic::new(
                    self.severity,
                    Subject::Type(declaring.clone()),
                    reason.clone(),
                ));
                EmissionOutcome::Failed {
                    artifact: self.helper_name(declaring).artifact().to_owned(),
                    reason,
                }
            }
        }
    }
}
