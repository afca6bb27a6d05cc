//! Turns validated elements into [`FieldRecord`]s and files them in the store.

use crate::command::{ResolutionError, TypeResolver};
use crate::diagnostic::{Diagnostic, DiagnosticSink, Severity, Subject};
use crate::field::FieldRecord;
use crate::model::Element;
use crate::store::FieldStore;

/// Counts of what happened to the elements handed to [`RecordBuilder::collect`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Records newly added to the store.
    pub inserted: usize,
    /// Records equal to one already stored.
    pub duplicates: usize,
    /// Elements whose type could not be resolved.
    pub unresolved: usize,
}

/// Builds field records using a [`TypeResolver`].
#[derive(Debug)]
pub struct RecordBuilder<'r, R: ?Sized> {
    resolver: &'r R,
}

impl<'r, R: TypeResolver + ?Sized> RecordBuilder<'r, R> {
    /// Creates a builder backed by `resolver`.
    #[must_use]
    pub const fn new(resolver: &'r R) -> Self {
        Self { resolver }
    }

    /// Builds the record for one element.
    ///
    /// # Errors
    ///
    /// Propagates the resolver's [`ResolutionError`] untouched.
    pub fn build(&self, element: &Element) -> Result<FieldRecord, ResolutionError> {
        let command = self.resolver.resolve(element.ty())?;
        Ok(FieldRecord::new(
            element.enclosing(),
            element.name(),
            element.ty().clone(),
            command,
        ))
    }

    /// Builds a record per element and upserts it under its declaring type.
    ///
    /// An element whose type cannot be resolved is reported as an error and
    /// left out; no fallback command is substituted.
    pub fn collect<D>(
        &self,
        elements: Vec<Element>,
        store: &mut FieldStore,
        diagnostics: &mut D,
    ) -> BuildSummary
    where
        D: DiagnosticSink + ?Sized,
    {
        let mut summary = BuildSummary::default();
        for element in elements {
            match self.build(&element) {
                Ok(record) => {
                    if store.upsert(element.enclosing(), record) {
                        summary.inserted += 1;
                    } else {
                        summary.duplicates += 1;
                    }
                }
                Err(err) => {
                    summary.unresolved += 1;
                    diagnostics.report(Diagnostic::new(
                        Severity::Error,
                        Subject::element(&element),
                        err.to_string(),
                    ));
                }
            }
        }
        summary
    }
}
