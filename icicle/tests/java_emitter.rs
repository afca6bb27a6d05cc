//! Golden output of the Java helper emitter.

use anyhow::{Result, ensure};
use icicle::{
    BundleResolver, DeclaringType, Emitter, FieldRecord, FieldSet, HelperName, JavaEmitter,
    RecordBuilder,
};
use test_helpers::elements::field;

const EXPECTED: &str = r#"// Generated code from Icicle. Do not modify!
package com.example;

import android.os.Bundle;

public class Outer$Inner$$Icicle {

  public static void saveInstanceState(Outer.Inner source, Bundle outState) {
    outState.putInt("com.example.Outer.Inner.count", source.count);
    outState.putParcelable("com.example.Outer.Inner.user", source.user);
    outState.putSerializable("com.example.Outer.Inner.created", source.created);
  }

  public static void restoreInstanceState(Outer.Inner target, Bundle savedInstanceState) {
    if (savedInstanceState == null) {
      return;
    }
    target.count = savedInstanceState.getInt("com.example.Outer.Inner.count");
    target.user = savedInstanceState.getParcelable("com.example.Outer.Inner.user");
    target.created = (java.util.Date) savedInstanceState.getSerializable("com.example.Outer.Inner.created");
  }
}
"#;

fn records() -> Result<FieldSet> {
    let builder = RecordBuilder::new(&BundleResolver);
    let elements = [
        field("com.example.Outer.Inner", "count", "int"),
        field("com.example.Outer.Inner", "user", "com.example.User")
            .extends(["android.os.Parcelable"]),
        field("com.example.Outer.Inner", "created", "java.util.Date"),
    ];
    elements
        .into_iter()
        .map(|fixture| -> Result<FieldRecord> { Ok(builder.build(&fixture.build()?)?) })
        .collect()
}

#[test]
fn nested_type_helper_matches_golden_output() -> Result<()> {
    let declaring = DeclaringType::new("com.example", "Outer.Inner");
    let helper = HelperName::for_type(&declaring, "$$Icicle");
    let mut out = Vec::new();
    JavaEmitter::new().emit(&declaring, &helper, &records()?, &mut out)?;
    let source = String::from_utf8(out)?;
    ensure!(source == EXPECTED, "generated source differs:\n{source}");
    Ok(())
}

#[test]
fn char_sequence_subtypes_are_cast_back() -> Result<()> {
    let builder = RecordBuilder::new(&BundleResolver);
    let elements = [
        field("com.example.Foo", "title", "java.lang.CharSequence"),
        field("com.example.Foo", "titles", "java.lang.CharSequence[]"),
        field("com.example.Foo", "label", "com.example.Label").extends(["java.lang.CharSequence"]),
        field("com.example.Foo", "labels", "com.example.Label[]")
            .extends(["java.lang.CharSequence"]),
    ];
    let fields = elements
        .into_iter()
        .map(|fixture| -> Result<FieldRecord> { Ok(builder.build(&fixture.build()?)?) })
        .collect::<Result<FieldSet>>()?;

    let declaring = DeclaringType::new("com.example", "Foo");
    let helper = HelperName::for_type(&declaring, "$$Icicle");
    let mut out = Vec::new();
    JavaEmitter::new().emit(&declaring, &helper, &fields, &mut out)?;
    let source = String::from_utf8(out)?;

    for line in [
        r#"target.title = savedInstanceState.getCharSequence("com.example.Foo.title");"#,
        r#"target.titles = savedInstanceState.getCharSequenceArray("com.example.Foo.titles");"#,
        r#"target.label = (com.example.Label) savedInstanceState.getCharSequence("com.example.Foo.label");"#,
        r#"target.labels = (com.example.Label[]) savedInstanceState.getCharSequenceArray("com.example.Foo.labels");"#,
    ] {
        ensure!(source.contains(line), "missing `{line}` in:\n{source}");
    }
    Ok(())
}
