//! Source model consumed by the generation pipeline.
//!
//! A host tool describes every field marked for persistence as an
//! [`Element`]: its simple name, the [`DeclaringType`] that encloses it, its
//! access [`Modifiers`] and its [`DeclaredType`]. The elements observed in one
//! processing cycle form a [`Round`].

mod parse;
mod types;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use types::{DeclaredType, DeclaringType};

/// Access and storage modifiers a field can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// Visible everywhere.
    Public,
    /// Visible to subclasses only.
    Protected,
    /// Visible to the declaring type only.
    Private,
    /// Belongs to the type rather than an instance.
    Static,
    /// Cannot be reassigned after construction.
    Final,
    /// Skipped by default serialisation.
    Transient,
    /// Read and written without caching.
    Volatile,
}

impl Modifier {
    /// Returns the keyword spelling of the modifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Static => "static",
            Self::Final => "final",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of [`Modifier`]s attached to an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(BTreeSet<Modifier>);

impl Modifiers {
    /// Creates an empty set, meaning package visibility.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Reports whether `modifier` is present.
    #[must_use]
    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    /// Adds `modifier`, returning `false` when it was already present.
    pub fn insert(&mut self, modifier: Modifier) -> bool {
        self.0.insert(modifier)
    }

    /// Iterates the modifiers in declaration-keyword order.
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.0.iter().copied()
    }

    /// Reports whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for Modifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Public,
            Self::Protected,
            Self::Private,
            Self::Static,
            Self::Final,
            Self::Transient,
            Self::Volatile,
        ]
        .into_iter()
        .find(|modifier| modifier.as_str() == s)
        .ok_or_else(|| format!("unknown modifier '{s}'"))
    }
}

/// A field-like declaration marked for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    name: String,
    enclosing: DeclaringType,
    modifiers: Modifiers,
    ty: DeclaredType,
}

impl Element {
    /// Creates a package-visible element with no modifiers.
    #[must_use]
    pub fn new(enclosing: DeclaringType, name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            enclosing,
            modifiers: Modifiers::new(),
            ty,
        }
    }

    /// Replaces the element's modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    /// Simple name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type that directly contains the field.
    #[must_use]
    pub const fn enclosing(&self) -> &DeclaringType {
        &self.enclosing
    }

    /// Modifiers declared on the field.
    #[must_use]
    pub const fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    /// Resolved type of the field.
    #[must_use]
    pub const fn ty(&self) -> &DeclaredType {
        &self.ty
    }
}

/// Candidate elements supplied to one processing round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Round {
    elements: Vec<Element>,
    is_final: bool,
}

impl Round {
    /// Creates an intermediate round.
    #[must_use]
    pub const fn new(elements: Vec<Element>) -> Self {
        Self {
            elements,
            is_final: false,
        }
    }

    /// Creates the round the host flags as its last one.
    #[must_use]
    pub const fn last(elements: Vec<Element>) -> Self {
        Self {
            elements,
            is_final: true,
        }
    }

    /// Elements in encounter order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Reports whether the host will not run another round.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.is_final
    }

    /// Consumes the round, yielding its elements.
    #[must_use]
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}
