//! Immutable per-field records and the insertion-ordered sets that hold them.

use indexmap::IndexSet;

use crate::command::Command;
use crate::model::{DeclaredType, DeclaringType};

/// Records of one declaring type, in first-seen order without duplicates.
pub type FieldSet = IndexSet<FieldRecord>;

/// Builds the state key of a field: `<qualified declaring type>.<name>`.
///
/// ```
/// use icicle::{DeclaringType, field_key};
///
/// let foo = DeclaringType::new("com.example", "Foo");
/// assert_eq!(field_key(&foo, "count"), "com.example.Foo.count");
/// ```
#[must_use]
pub fn field_key(declaring: &DeclaringType, name: &str) -> String {
    format!("{}.{name}", declaring.qualified_name())
}

/// A validated field ready for emission.
///
/// Equality and hashing cover every attribute, so two records only collapse
/// in a [`FieldSet`] when name, key, type and command all agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRecord {
    name: String,
    key: String,
    declared_type: DeclaredType,
    command: Command,
}

impl FieldRecord {
    /// Creates the record for field `name` of `declaring`.
    #[must_use]
    pub fn new(
        declaring: &DeclaringType,
        name: impl Into<String>,
        declared_type: DeclaredType,
        command: Command,
    ) -> Self {
        let name = name.into();
        Self {
            key: field_key(declaring, &name),
            name,
            declared_type,
            command,
        }
    }

    /// Simple name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Globally unique state key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Declared type of the field.
    #[must_use]
    pub const fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    /// Persistence command resolved for the declared type.
    #[must_use]
    pub const fn command(&self) -> Command {
        self.command
    }
}
