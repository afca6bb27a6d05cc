//! Java source emitter for `android.os.Bundle` helpers.

use std::io::{self, Write};

use super::{Emitter, HelperName};
use crate::field::{FieldRecord, FieldSet};
use crate::model::DeclaringType;

const BUNDLE: &str = "android.os.Bundle";
const INDENT: &str = "  ";

/// Emits a Java class with static `saveInstanceState` and
/// `restoreInstanceState` methods.
///
/// The helper lives in the declaring type's package so it can access
/// package-visible fields directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaEmitter;

impl JavaEmitter {
    /// Creates the emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_save(
        out: &mut dyn Write,
        target: &str,
        fields: &FieldSet,
    ) -> io::Result<()> {
        writeln!(
            out,
            "{INDENT}public static void saveInstanceState({target} source, Bundle outState) {{"
        )?;
        for field in fields {
            writeln!(
                out,
                "{INDENT}{INDENT}outState.{}(\"{}\", source.{});",
                field.command().put_method(),
                field.key(),
                field.name()
            )?;
        }
        writeln!(out, "{INDENT}}}")
    }

    fn write_restore(
        out: &mut dyn Write,
        target: &str,
        fields: &FieldSet,
    ) -> io::Result<()> {
        writeln!(
            out,
            "{INDENT}public static void restoreInstanceState({target} target, Bundle savedInstanceState) {{"
        )?;
        writeln!(out, "{INDENT}{INDENT}if (savedInstanceState == null) {{")?;
        writeln!(out, "{INDENT}{INDENT}{INDENT}return;")?;
        writeln!(out, "{INDENT}{INDENT}}}")?;
        for field in fields {
            writeln!(
                out,
                "{INDENT}{INDENT}target.{} = {}savedInstanceState.{}(\"{}\");",
                field.name(),
                cast(field),
                field.command().get_method(),
                field.key()
            )?;
        }
        writeln!(out, "{INDENT}}}")
    }
}

fn cast(field: &FieldRecord) -> String {
    if field.command().requires_cast(field.declared_type()) {
        format!("({}) ", field.declared_type())
    } else {
        String::new()
    }
}

impl Emitter for JavaEmitter {
    fn emit(
        &self,
        declaring: &DeclaringType,
        helper: &HelperName,
        fields: &FieldSet,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        writeln!(out, "// Generated code from Icicle. Do not modify!")?;
        if !declaring.package().is_empty() {
            writeln!(out, "package {};", declaring.package())?;
        }
        writeln!(out)?;
        writeln!(out, "import {BUNDLE};")?;
        writeln!(out)?;
        writeln!(out, "public class {} {{", helper.class_name())?;
        writeln!(out)?;
        Self::write_save(out, declaring.name(), fields)?;
        writeln!(out)?;
        Self::write_restore(out, declaring.name(), fields)?;
        writeln!(out, "}}")
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};

    use super::*;
    use crate::command::{Command, Strategy};
    use crate::model::DeclaredType;

    fn render(declaring: &DeclaringType, fields: &FieldSet) -> Result<String> {
        let helper = HelperName::for_type(declaring, "$$Icicle");
        let mut out = Vec::new();
        JavaEmitter::new().emit(declaring, &helper, fields, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn default_package_omits_package_clause() -> Result<()> {
        let declaring = DeclaringType::new("", "Foo");
        let source = render(&declaring, &FieldSet::new())?;
        ensure!(!source.contains("package"));
        ensure!(source.contains("public class Foo$$Icicle {"));
        Ok(())
    }

    #[test]
    fn serializable_fields_are_cast_back() -> Result<()> {
        let declaring = DeclaringType::new("com.example", "Foo");
        let ty: DeclaredType = DeclaredType::new("java.util.Date");
        let fields = FieldSet::from_iter([FieldRecord::new(
            &declaring,
            "when",
            ty,
            Command::new(Strategy::Serializable),
        )]);
        let source = render(&declaring, &fields)?;
        ensure!(source.contains(
            "target.when = (java.util.Date) savedInstanceState.getSerializable(\"com.example.Foo.when\");"
        ));
        Ok(())
    }
}
