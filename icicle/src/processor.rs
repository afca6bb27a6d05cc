//! Round orchestration.
//!
//! Each call to [`IcicleProcessor::process`] runs one round:
//!
//! 1. **Collecting** — validate the round's elements, build records and
//!    merge them into the process-wide [`FieldStore`].
//! 2. **Emitting** — write a helper for each stored type, honouring the
//!    configured [`ReemitPolicy`].
//!
//! The store and the set of emitted types live as long as the processor, so
//! a host running several rounds sees records accumulate across them.

use indexmap::IndexMap;

use crate::builder::{BuildSummary, RecordBuilder};
use crate::command::{BundleResolver, TypeResolver};
use crate::config::{ProcessorConfig, ReemitPolicy};
use crate::diagnostic::{CountingSink, Diagnostic, DiagnosticSink, Severity, Subject};
use crate::emit::java::JavaEmitter;
use crate::emit::{ArtifactSink, EmissionDriver, EmissionOutcome, EmissionReport, Emitter};
use crate::field::FieldRecord;
use crate::model::{DeclaringType, Round};
use crate::store::FieldStore;
use crate::validate::FieldValidator;

/// Phase of the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundState {
    /// Validating elements and filling the store.
    #[default]
    Collecting,
    /// Writing helpers for stored types.
    Emitting,
}

/// Summary of one processed round.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct RoundReport {
    /// One-based round number.
    pub round: usize,
    /// Number of candidate elements supplied by the host.
    pub candidates: usize,
    /// Elements rejected by modifier validation.
    pub rejected: usize,
    /// What happened to the elements that passed validation.
    pub build: BuildSummary,
    /// Per-type emission outcomes.
    pub emission: EmissionReport,
    /// Error diagnostics reported during the round.
    pub errors: usize,
    /// Warning diagnostics reported during the round.
    pub warnings: usize,
}

impl RoundReport {
    /// Whether the round claimed its annotations.
    ///
    /// Always `true`: the host must not hand the same markers to another
    /// processor, whatever diagnostics were reported.
    #[must_use]
    pub const fn claimed(&self) -> bool {
        true
    }
}

/// Runs validation, grouping and emission for successive rounds.
#[derive(Debug)]
pub struct IcicleProcessor<R = BundleResolver, E = JavaEmitter> {
    config: ProcessorConfig,
    resolver: R,
    emitter: E,
    store: FieldStore,
    emitted: IndexMap<DeclaringType, usize>,
    state: RoundState,
    rounds: usize,
}

impl IcicleProcessor {
    /// Creates a processor using [`BundleResolver`] and [`JavaEmitter`].
    #[must_use]
    pub fn new(config: ProcessorConfig) -> Self {
        Self::with_collaborators(config, BundleResolver, JavaEmitter::new())
    }
}

impl<R: TypeResolver, E: Emitter> IcicleProcessor<R, E> {
    /// Creates a processor with custom collaborators.
    #[must_use]
    pub fn with_collaborators(config: ProcessorConfig, resolver: R, emitter: E) -> Self {
        Self {
            config,
            resolver,
            emitter,
            store: FieldStore::new(),
            emitted: IndexMap::new(),
            state: RoundState::Collecting,
            rounds: 0,
        }
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Records accumulated so far.
    #[must_use]
    pub const fn store(&self) -> &FieldStore {
        &self.store
    }

    /// Phase the processor is in; `Collecting` between rounds.
    #[must_use]
    pub const fn state(&self) -> RoundState {
        self.state
    }

    /// Number of rounds processed.
    #[must_use]
    pub const fn rounds(&self) -> usize {
        self.rounds
    }

    /// Declaring types whose helper has been written, in emission order.
    pub fn emitted(&self) -> impl Iterator<Item = &DeclaringType> {
        self.emitted.keys()
    }

    /// Processes one round.
    ///
    /// Never fails: rejected fields, unresolvable types and artifact errors
    /// are reported to `diagnostics` and the rest of the round proceeds.
    pub fn process<S, D>(&mut self, round: Round, sink: &mut S, diagnostics: &mut D) -> RoundReport
    where
        S: ArtifactSink + ?Sized,
        D: DiagnosticSink + ?Sized,
    {
        self.rounds += 1;
        let span = tracing::info_span!("round", index = self.rounds, is_final = round.is_final());
        let _entered = span.enter();
        let mut diagnostics = CountingSink::new(diagnostics);

        self.state = RoundState::Collecting;
        let is_final = round.is_final();
        let elements = round.into_elements();
        let candidates = elements.len();
        let eligible = FieldValidator::new(self.config.validation_severity)
            .validate(elements, &mut diagnostics);
        let rejected = candidates - eligible.len();
        let build =
            RecordBuilder::new(&self.resolver).collect(eligible, &mut self.store, &mut diagnostics);
        tracing::debug!(candidates, rejected, inserted = build.inserted, "collected fields");

        self.state = RoundState::Emitting;
        let emission = self.emit_helpers(is_final, sink, &mut diagnostics);
        self.state = RoundState::Collecting;

        tracing::info!(
            written = emission.written(),
            skipped = emission.skipped(),
            failed = emission.failed(),
            "round complete"
        );
        RoundReport {
            round: self.rounds,
            candidates,
            rejected,
            build,
            emission,
            errors: diagnostics.errors(),
            warnings: diagnostics.warnings(),
        }
    }

    fn emit_helpers<S, D>(&mut self, is_final: bool, sink: &mut S, diagnostics: &mut D) -> EmissionReport
    where
        S: ArtifactSink + ?Sized,
        D: DiagnosticSink + ?Sized,
    {
        let mut report = EmissionReport::default();
        let policy = self.config.reemit;
        if policy == ReemitPolicy::FinalRound && !is_final {
            tracing::debug!(types = self.store.len(), "deferring emission to the final round");
            return report;
        }
        let driver = EmissionDriver::new(
            &self.emitter,
            &self.config.suffix,
            self.config.artifact_severity,
        );
        for (declaring, fields) in self.store.iter() {
            if policy != ReemitPolicy::Attempt
                && let Some(emitted_count) = self.emitted.get_mut(declaring)
            {
                if fields.len() > *emitted_count {
                    let late: Vec<&str> = fields
                        .iter()
                        .skip(*emitted_count)
                        .map(FieldRecord::name)
                        .collect();
                    diagnostics.report(Diagnostic::new(
                        Severity::Warning,
                        Subject::Type(declaring.clone()),
                        format!(
                            "helper already generated; fields added in a later round are not persisted: {}",
                            late.join(", ")
                        ),
                    ));
                    *emitted_count = fields.len();
                }
                let artifact = driver.helper_name(declaring).artifact().to_owned();
                tracing::debug!(artifact = %artifact, "helper already generated, skipping");
                report.push(declaring.clone(), EmissionOutcome::Skipped { artifact });
                continue;
            }
            let outcome = driver.emit(declaring, fields, sink, diagnostics);
            if matches!(outcome, EmissionOutcome::Written { .. }) {
                self.emitted.insert(declaring.clone(), fields.len());
            }
            report.push(declaring.clone(), outcome);
        }
        report
    }
}
