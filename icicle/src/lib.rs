//! Core of the `icicle` helper generator.
//!
//! Fields marked for automatic persistence are discovered by a host tool and
//! handed to an [`IcicleProcessor`] one round at a time. The processor
//! validates each candidate, groups the survivors by declaring type and
//! writes one `<qualified name>$$Icicle` helper per type. The helper knows
//! how to save those fields into a state bundle and restore them after the
//! owning object has been torn down and rebuilt.
//!
//! Failures never abort a round. Rejected fields, unsupported types and
//! artifact I/O errors are all reported through a [`DiagnosticSink`] and the
//! remaining work carries on.
//!
//! ```
//! use icicle::{
//!     DeclaredType, DeclaringType, Diagnostic, Element, IcicleProcessor, MemorySink, Modifier,
//!     ProcessorConfig, Round,
//! };
//!
//! # fn main() -> Result<(), icicle::IcicleError> {
//! let foo: DeclaringType = "com.example.Foo".parse()?;
//! let count = Element::new(foo.clone(), "count", DeclaredType::new("int"));
//! let tag = Element::new(foo, "TAG", "java.lang.String".parse()?)
//!     .with_modifiers([Modifier::Static, Modifier::Final]);
//!
//! let mut processor = IcicleProcessor::new(ProcessorConfig::default());
//! let mut sink = MemorySink::new();
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let report = processor.process(Round::last(vec![count, tag]), &mut sink, &mut diagnostics);
//!
//! assert!(report.claimed());
//! assert_eq!(diagnostics.len(), 1);
//! assert!(sink.artifact("com.example.Foo$$Icicle").is_some());
//! # Ok(())
//! # }
//! ```

mod builder;
mod command;
mod config;
mod diagnostic;
pub mod emit;
mod error;
mod field;
pub mod model;
mod processor;
mod sink;
mod store;
mod validate;

pub use builder::{BuildSummary, RecordBuilder};
pub use command::{BundleResolver, Command, ResolutionError, Strategy, TypeResolver};
pub use config::{DEFAULT_SUFFIX, ProcessorConfig, ReemitPolicy};
pub use diagnostic::{CountingSink, Diagnostic, DiagnosticSink, Severity, Subject};
pub use emit::java::JavaEmitter;
pub use emit::{
    ArtifactSink, EmissionDriver, EmissionOutcome, EmissionReport, Emitter, HelperName,
};
pub use error::IcicleError;
pub use field::{FieldRecord, FieldSet, field_key};
pub use model::{DeclaredType, DeclaringType, Element, Modifier, Modifiers, Round};
pub use processor::{IcicleProcessor, RoundReport, RoundState};
pub use sink::MemorySink;
pub use store::FieldStore;
pub use validate::{DISALLOWED_MODIFIERS, FieldValidator};
