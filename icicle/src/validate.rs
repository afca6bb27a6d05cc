//! Modifier validation for candidate fields.
//!
//! Helpers live in the same package as the declaring type but in a
//! different class, so every persisted field must be package-visible and
//! mutable.

use crate::diagnostic::{Diagnostic, DiagnosticSink, Severity, Subject};
use crate::model::{Element, Modifier};

/// Modifiers that make a field ineligible for persistence.
pub const DISALLOWED_MODIFIERS: [Modifier; 4] = [
    Modifier::Private,
    Modifier::Protected,
    Modifier::Static,
    Modifier::Final,
];

/// Rejects fields the generated helper could not read or assign.
#[derive(Debug, Clone, Copy)]
pub struct FieldValidator {
    severity: Severity,
}

impl FieldValidator {
    /// Creates a validator reporting rejections at `severity`.
    #[must_use]
    pub const fn new(severity: Severity) -> Self {
        Self { severity }
    }

    /// Checks a single element.
    ///
    /// # Errors
    ///
    /// Returns the diagnostic describing every disallowed modifier found.
    pub fn check(&self, element: &Element) -> Result<(), Diagnostic> {
        let found: Vec<&str> = DISALLOWED_MODIFIERS
            .into_iter()
            .filter(|modifier| element.modifiers().contains(*modifier))
            .map(Modifier::as_str)
            .collect();
        if found.is_empty() {
            return Ok(());
        }
        Err(Diagnostic::new(
            self.severity,
            Subject::element(element),
            format!(
                "field must not be private, protected, static or final (found {})",
                found.join(", ")
            ),
        ))
    }

    /// Keeps the eligible elements in encounter order.
    ///
    /// Each rejected element produces exactly one diagnostic; scanning always
    /// continues to the end.
    pub fn validate<D>(&self, elements: Vec<Element>, diagnostics: &mut D) -> Vec<Element>
    where
        D: DiagnosticSink + ?Sized,
    {
        elements
            .into_iter()
            .filter(|element| match self.check(element) {
                Ok(()) => true,
                Err(diagnostic) => {
                    diagnostics.report(diagnostic);
                    false
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::model::{DeclaredType, DeclaringType};

    fn element(name: &str, modifiers: &[Modifier]) -> Element {
        Element::new(
            DeclaringType::new("com.example", "Foo"),
            name,
            DeclaredType::new("int"),
        )
        .with_modifiers(modifiers.iter().copied())
    }

    #[rstest]
    #[case::private(&[Modifier::Private])]
    #[case::protected(&[Modifier::Protected])]
    #[case::static_field(&[Modifier::Static])]
    #[case::final_field(&[Modifier::Final])]
    #[case::constant(&[Modifier::Public, Modifier::Static, Modifier::Final])]
    fn disallowed_modifiers_produce_one_diagnostic(#[case] modifiers: &[Modifier]) {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let survivors = FieldValidator::new(Severity::Error)
            .validate(vec![element("x", modifiers)], &mut diagnostics);
        assert!(survivors.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[rstest]
    #[case::package(&[])]
    #[case::public(&[Modifier::Public])]
    #[case::transient(&[Modifier::Transient, Modifier::Volatile])]
    fn eligible_fields_pass(#[case] modifiers: &[Modifier]) {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let survivors = FieldValidator::new(Severity::Error)
            .validate(vec![element("x", modifiers)], &mut diagnostics);
        assert_eq!(survivors.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn scanning_continues_after_rejection() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let survivors = FieldValidator::new(Severity::Warning).validate(
            vec![
                element("a", &[]),
                element("B", &[Modifier::Static]),
                element("c", &[Modifier::Public]),
            ],
            &mut diagnostics,
        );
        let names: Vec<&str> = survivors.iter().map(Element::name).collect();
        assert_eq!(names, ["a", "c"]);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.iter().all(|d| d.severity() == Severity::Warning));
    }

    #[test]
    fn message_names_offending_modifiers() {
        let diagnostic = FieldValidator::new(Severity::Error)
            .check(&element("TAG", &[Modifier::Static, Modifier::Final]))
            .err();
        assert_eq!(
            diagnostic.as_ref().map(Diagnostic::message),
            Some("field must not be private, protected, static or final (found static, final)")
        );
    }
}
