//! In-memory artifact sink.

use std::io::{self, Write};

use indexmap::{IndexMap, IndexSet};

use crate::emit::{ArtifactSink, HelperName};
use crate::model::DeclaringType;

/// Keeps generated artifacts in memory, keyed by artifact name.
///
/// Failures can be injected per artifact name, which makes the sink useful
/// for exercising partial-failure paths as well as for dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: IndexMap<String, Vec<u8>>,
    failing: IndexSet<String>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every creation of `artifact` fail with an I/O error.
    #[must_use]
    pub fn failing_on(mut self, artifact: impl Into<String>) -> Self {
        self.failing.insert(artifact.into());
        self
    }

    /// Contents of `artifact`, if it was created and holds UTF-8.
    #[must_use]
    pub fn artifact(&self, artifact: &str) -> Option<&str> {
        self.artifacts
            .get(artifact)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Artifact names in creation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    /// Number of artifacts created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Reports whether nothing was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn create(
        &mut self,
        helper: &HelperName,
        _anchor: &DeclaringType,
    ) -> io::Result<Box<dyn Write + '_>> {
        let name = helper.artifact();
        if self.failing.contains(name) {
            return Err(io::Error::other(format!("simulated failure creating {name}")));
        }
        if self.artifacts.contains_key(name) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("artifact {name} already exists"),
            ));
        }
        let buffer = self.artifacts.entry(name.to_owned()).or_default();
        Ok(Box::new(buffer))
    }
}
