//! Diagnostics reported by the pipeline instead of failing a round.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{DeclaringType, Element};

/// How seriously the host should treat a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Breaks the build.
    Error,
    /// Reported but does not break the build.
    Warning,
    /// Informational.
    Note,
}

impl Severity {
    /// Lower-case label used when rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "note" => Ok(Self::Note),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// What a diagnostic is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// A single field.
    Element {
        /// Type declaring the field.
        enclosing: DeclaringType,
        /// Simple name of the field.
        name: String,
    },
    /// A declaring type as a whole, typically the anchor of its helper.
    Type(DeclaringType),
}

impl Subject {
    /// Subject pointing at `element`.
    #[must_use]
    pub fn element(element: &Element) -> Self {
        Self::Element {
            enclosing: element.enclosing().clone(),
            name: element.name().to_owned(),
        }
    }

    /// Declaring type the subject belongs to.
    #[must_use]
    pub const fn declaring_type(&self) -> &DeclaringType {
        match self {
            Self::Element { enclosing, .. } => enclosing,
            Self::Type(ty) => ty,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element { enclosing, name } => write!(f, "{enclosing}.{name}"),
            Self::Type(ty) => write!(f, "{ty}"),
        }
    }
}

/// A message attached to an element or type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    severity: Severity,
    subject: Subject,
    message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(severity: Severity, subject: Subject, message: impl Into<String>) -> Self {
        Self {
            severity,
            subject,
            message: message.into(),
        }
    }

    /// Severity chosen for the diagnostic.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Element or type the diagnostic is attached to.
    #[must_use]
    pub const fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Human-readable description of the problem.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Reports whether the diagnostic breaks the build.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.subject, self.message)
    }
}

/// Receiver for diagnostics produced during a round.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink adapter that logs and counts diagnostics before forwarding them.
#[derive(Debug)]
pub struct CountingSink<'a, D: ?Sized> {
    inner: &'a mut D,
    errors: usize,
    warnings: usize,
}

impl<'a, D: DiagnosticSink + ?Sized> CountingSink<'a, D> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: &'a mut D) -> Self {
        Self {
            inner,
            errors: 0,
            warnings: 0,
        }
    }

    /// Number of error diagnostics forwarded so far.
    #[must_use]
    pub const fn errors(&self) -> usize {
        self.errors
    }

    /// Number of warning diagnostics forwarded so far.
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.warnings
    }
}

impl<D: DiagnosticSink + ?Sized> DiagnosticSink for CountingSink<'_, D> {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Note => {}
        }
        tracing::debug!(
            severity = %diagnostic.severity(),
            subject = %diagnostic.subject(),
            "{}",
            diagnostic.message()
        );
        self.inner.report(diagnostic);
    }
}
