//! Process-wide grouping of field records by declaring type.

use indexmap::IndexMap;

use crate::field::{FieldRecord, FieldSet};
use crate::model::DeclaringType;

/// Accumulates [`FieldRecord`]s per declaring type across rounds.
///
/// Types iterate in the order they were first seen. Nothing is ever removed,
/// and a type only appears once it owns at least one record.
#[derive(Debug, Default)]
pub struct FieldStore {
    types: IndexMap<DeclaringType, FieldSet>,
}

impl FieldStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of `declaring`, if any have been stored.
    #[must_use]
    pub fn get(&self, declaring: &DeclaringType) -> Option<&FieldSet> {
        self.types.get(declaring)
    }

    /// Adds `record` under `declaring`.
    ///
    /// Returns `false` without changing anything when an equal record is
    /// already present.
    pub fn upsert(&mut self, declaring: &DeclaringType, record: FieldRecord) -> bool {
        if let Some(fields) = self.types.get_mut(declaring) {
            return fields.insert(record);
        }
        self.types
            .insert(declaring.clone(), FieldSet::from_iter([record]));
        true
    }

    /// Iterates `(declaring type, records)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&DeclaringType, &FieldSet)> {
        self.types.iter()
    }

    /// Reports whether `declaring` has any records.
    #[must_use]
    pub fn contains(&self, declaring: &DeclaringType) -> bool {
        self.types.contains_key(declaring)
    }

    /// Number of declaring types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Reports whether no type has been stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Total number of records across all types.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.types.values().map(FieldSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, Strategy};
    use crate::model::DeclaredType;

    fn foo() -> DeclaringType {
        DeclaringType::new("com.example", "Foo")
    }

    fn record(name: &str, strategy: Strategy) -> FieldRecord {
        FieldRecord::new(&foo(), name, DeclaredType::new("int"), Command::new(strategy))
    }

    #[test]
    fn reading_never_creates_entries() {
        let store = FieldStore::new();
        assert!(store.get(&foo()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn equal_records_are_inserted_once() {
        let mut store = FieldStore::new();
        assert!(store.upsert(&foo(), record("count", Strategy::Int)));
        assert!(!store.upsert(&foo(), record("count", Strategy::Int)));
        assert_eq!(store.get(&foo()).map(FieldSet::len), Some(1));
    }

    #[test]
    fn records_differing_in_command_are_distinct() {
        let mut store = FieldStore::new();
        store.upsert(&foo(), record("count", Strategy::Int));
        store.upsert(&foo(), record("count", Strategy::Serializable));
        assert_eq!(store.record_count(), 2);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut store = FieldStore::new();
        for name in ["b", "a", "c", "a"] {
            store.upsert(&foo(), record(name, Strategy::Int));
        }
        let names: Vec<&str> = store
            .get(&foo())
            .into_iter()
            .flatten()
            .map(FieldRecord::name)
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn declaring_type_identity_is_structural() {
        let mut store = FieldStore::new();
        store.upsert(&foo(), record("a", Strategy::Int));
        store.upsert(&DeclaringType::new("com.example", "Foo"), record("b", Strategy::Int));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&foo()));
    }

    #[test]
    fn package_split_does_not_change_identity() {
        let mut store = FieldStore::new();
        let nested = DeclaringType::new("a", "B.C");
        let top_level = DeclaringType::new("a.B", "C");
        store.upsert(&nested, record("x", Strategy::Int));
        store.upsert(&top_level, record("y", Strategy::Int));
        assert_eq!(store.len(), 1);
        assert_eq!(store.record_count(), 2);
        assert!(store.contains(&DeclaringType::new("", "a.B.C")));
    }
}
