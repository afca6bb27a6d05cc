//! End-to-end rounds through `IcicleProcessor`.
//!
//! Covers modifier rejection, per-type failure isolation, deduplication and
//! the behaviour of each re-emission policy across rounds.

use anyhow::{Context, Result, ensure};
use icicle::{
    DeclaredType, DeclaringType, Diagnostic, Element, EmissionOutcome, IcicleProcessor,
    MemorySink, ProcessorConfig, ReemitPolicy, Round, Severity, Subject,
};
use rstest::{fixture, rstest};
use test_helpers::elements::{field, round};

const FOO_HELPER: &str = "com.example.Foo$$Icicle";
const BAR_HELPER: &str = "com.example.Bar$$Icicle";

fn foo() -> DeclaringType {
    DeclaringType::new("com.example", "Foo")
}

fn with_policy(reemit: ReemitPolicy) -> IcicleProcessor {
    IcicleProcessor::new(ProcessorConfig {
        reemit,
        ..ProcessorConfig::default()
    })
}

#[fixture]
fn processor() -> IcicleProcessor {
    IcicleProcessor::new(ProcessorConfig::default())
}

#[rstest]
fn rejects_static_final_and_persists_the_rest(mut processor: IcicleProcessor) -> Result<()> {
    let input = round(
        vec![
            field("com.example.Foo", "count", "int"),
            field("com.example.Foo", "TAG", "java.lang.String").modifiers(["static", "final"]),
        ],
        true,
    )?;
    let mut sink = MemorySink::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = processor.process(input, &mut sink, &mut diagnostics);

    ensure!(report.claimed(), "round must always be claimed");
    ensure!(report.rejected == 1, "expected one rejection, got {}", report.rejected);
    ensure!(diagnostics.len() == 1, "unexpected diagnostics: {diagnostics:?}");
    let rejection = diagnostics.first().context("missing diagnostic")?;
    ensure!(rejection.severity() == Severity::Error);
    ensure!(
        *rejection.subject()
            == Subject::Element {
                enclosing: foo(),
                name: "TAG".to_owned(),
            },
        "diagnostic attached to {}",
        rejection.subject()
    );

    let source = sink.artifact(FOO_HELPER).context("helper not written")?;
    ensure!(source.contains("outState.putInt(\"com.example.Foo.count\", source.count);"));
    ensure!(source.contains("target.count = savedInstanceState.getInt(\"com.example.Foo.count\");"));
    ensure!(!source.contains("TAG"), "rejected field leaked into helper");
    Ok(())
}

#[rstest]
fn artifact_failure_is_isolated_to_its_type(mut processor: IcicleProcessor) -> Result<()> {
    let input = round(
        vec![
            field("com.example.Foo", "count", "int"),
            field("com.example.Bar", "name", "java.lang.String"),
        ],
        true,
    )?;
    let mut sink = MemorySink::new().failing_on(FOO_HELPER);
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = processor.process(input, &mut sink, &mut diagnostics);

    ensure!(report.emission.failed() == 1 && report.emission.written() == 1);
    ensure!(sink.artifact(BAR_HELPER).is_some(), "Bar helper missing");
    ensure!(sink.artifact(FOO_HELPER).is_none(), "Foo helper should not exist");
    let failure = diagnostics.first().context("missing diagnostic")?;
    ensure!(*failure.subject() == Subject::Type(foo()));
    ensure!(
        failure.message().contains("impossible to create com.example.Foo$$Icicle"),
        "unexpected message: {}",
        failure.message()
    );
    Ok(())
}

#[rstest]
fn types_without_valid_fields_get_no_helper(mut processor: IcicleProcessor) -> Result<()> {
    let input = round(
        vec![field("com.example.Foo", "secret", "int").modifiers(["private"])],
        true,
    )?;
    let mut sink = MemorySink::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = processor.process(input, &mut sink, &mut diagnostics);

    ensure!(!processor.store().contains(&foo()), "type was stored");
    ensure!(report.emission.is_empty());
    ensure!(sink.is_empty());
    Ok(())
}

#[rstest]
fn unresolvable_types_are_reported_not_stored(mut processor: IcicleProcessor) -> Result<()> {
    let input = round(
        vec![
            field("com.example.Foo", "thing", "com.example.Opaque"),
            field("com.example.Foo", "count", "int"),
        ],
        true,
    )?;
    let mut sink = MemorySink::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = processor.process(input, &mut sink, &mut diagnostics);

    ensure!(report.build.unresolved == 1, "build summary: {:?}", report.build);
    ensure!(diagnostics.iter().all(Diagnostic::is_error) && diagnostics.len() == 1);
    let fields = processor.store().get(&foo()).context("Foo not stored")?;
    ensure!(fields.len() == 1);
    Ok(())
}

#[rstest]
fn repeated_fields_collapse_to_one_record(mut processor: IcicleProcessor) -> Result<()> {
    let input = round(
        vec![
            field("com.example.Foo", "count", "int"),
            field("com.example.Foo", "count", "int"),
        ],
        true,
    )?;
    let mut sink = MemorySink::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = processor.process(input, &mut sink, &mut diagnostics);

    ensure!(report.build.inserted == 1 && report.build.duplicates == 1);
    let source = sink.artifact(FOO_HELPER).context("helper not written")?;
    ensure!(source.matches("putInt").count() == 1);
    Ok(())
}

#[rstest]
fn one_qualified_name_yields_one_helper(mut processor: IcicleProcessor) -> Result<()> {
    let input = Round::last(vec![
        Element::new(DeclaringType::new("a", "B.C"), "x", DeclaredType::new("int")),
        Element::new(DeclaringType::new("a.B", "C"), "y", DeclaredType::new("int")),
    ]);
    let mut sink = MemorySink::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = processor.process(input, &mut sink, &mut diagnostics);

    ensure!(processor.store().len() == 1, "stored {} types", processor.store().len());
    ensure!(report.emission.written() == 1 && report.emission.failed() == 0);
    ensure!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    let source = sink.artifact("a.B.C$$Icicle").context("helper not written")?;
    ensure!(source.contains("source.x") && source.contains("source.y"));
    Ok(())
}

#[rstest]
fn skip_policy_writes_once_and_warns_about_late_fields() -> Result<()> {
    let mut processor = with_policy(ReemitPolicy::Skip);
    let mut sink = MemorySink::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let first = processor.process(
        round(vec![field("com.example.Foo", "count", "int")], false)?,
        &mut sink,
        &mut diagnostics,
    );
    ensure!(first.emission.written() == 1);

    let second = processor.process(
        round(vec![field("com.example.Foo", "label", "java.lang.String")], true)?,
        &mut sink,
        &mut diagnostics,
    );
    ensure!(second.emission.skipped() == 1 && second.emission.failed() == 0);
    ensure!(second.warnings == 1 && second.errors == 0);
    let warning = diagnostics.first().context("missing warning")?;
    ensure!(warning.message().ends_with("label"), "got {}", warning.message());

    let source = sink.artifact(FOO_HELPER).context("helper not written")?;
    ensure!(!source.contains("label"), "late field must not be persisted");
    Ok(())
}

#[rstest]
fn attempt_policy_reports_the_second_creation() -> Result<()> {
    let mut processor = with_policy(ReemitPolicy::Attempt);
    let mut sink = MemorySink::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let _first = processor.process(
        round(vec![field("com.example.Foo", "count", "int")], false)?,
        &mut sink,
        &mut diagnostics,
    );
    let second = processor.process(
        round(vec![field("com.example.Bar", "name", "java.lang.String")], true)?,
        &mut sink,
        &mut diagnostics,
    );

    ensure!(second.errors == 1, "expected one error, got {diagnostics:?}");
    ensure!(matches!(
        second.emission.outcome(&foo()),
        Some(EmissionOutcome::Failed { .. })
    ));
    ensure!(sink.artifact(BAR_HELPER).is_some());
    Ok(())
}

#[rstest]
fn final_round_policy_defers_until_the_last_round() -> Result<()> {
    let mut processor = with_policy(ReemitPolicy::FinalRound);
    let mut sink = MemorySink::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let first = processor.process(
        round(vec![field("com.example.Foo", "count", "int")], false)?,
        &mut sink,
        &mut diagnostics,
    );
    ensure!(first.emission.is_empty() && sink.is_empty());

    let _last = processor.process(
        round(vec![field("com.example.Foo", "label", "java.lang.String")], true)?,
        &mut sink,
        &mut diagnostics,
    );
    let source = sink.artifact(FOO_HELPER).context("helper not written")?;
    ensure!(source.contains("source.count") && source.contains("source.label"));
    ensure!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    ensure!(processor.rounds() == 2);
    Ok(())
}

#[rstest]
fn empty_rounds_are_claimed_and_quiet(mut processor: IcicleProcessor) -> Result<()> {
    let mut sink = MemorySink::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = processor.process(Round::last(Vec::new()), &mut sink, &mut diagnostics);
    ensure!(report.claimed() && report.candidates == 0);
    ensure!(diagnostics.is_empty() && sink.is_empty());
    Ok(())
}
