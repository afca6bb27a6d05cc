//! Type descriptors: the declaring type of a field and the field's own type.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::parse::TypeParser;
use crate::error::IcicleError;

/// Type that directly contains a persisted field.
///
/// Identity is the qualified name: `a` + `B.C` and `a.B` + `C` are the same
/// type, no matter where the package boundary was drawn or which round
/// produced the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeclaringType {
    package: String,
    name: String,
}

impl DeclaringType {
    /// Creates a declaring type from its package and (possibly nested) name.
    ///
    /// Nested types separate their segments with `.`, as in `Outer.Inner`.
    #[must_use]
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Package the type lives in; empty for the default package.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Name of the type relative to its package.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Innermost segment of [`Self::name`].
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Fully qualified name, `package.Name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.package
            .split('.')
            .filter(|segment| !segment.is_empty())
            .chain(self.name.split('.'))
    }
}

impl PartialEq for DeclaringType {
    fn eq(&self, other: &Self) -> bool {
        self.segments().eq(other.segments())
    }
}

impl Eq for DeclaringType {}

impl Hash for DeclaringType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for segment in self.segments() {
            segment.hash(state);
        }
    }
}

impl PartialOrd for DeclaringType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeclaringType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments().cmp(other.segments())
    }
}

impl fmt::Display for DeclaringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.package.is_empty() {
            write!(f, "{}.", self.package)?;
        }
        f.write_str(&self.name)
    }
}

impl FromStr for DeclaringType {
    type Err = IcicleError;

    /// Splits a qualified name at the first segment that starts with an
    /// upper-case letter. A name without such a segment keeps only its last
    /// segment as the type name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('.').collect();
        if segments.iter().any(|segment| !is_identifier(segment)) {
            return Err(IcicleError::type_syntax(
                s,
                "expected dot-separated identifiers",
            ));
        }
        let split = segments
            .iter()
            .position(|segment| segment.starts_with(|c: char| c.is_ascii_uppercase()))
            .unwrap_or(segments.len().saturating_sub(1));
        let (package, name) = segments.split_at(split);
        Ok(Self::new(package.join("."), name.join(".")))
    }
}

impl TryFrom<String> for DeclaringType {
    type Error = IcicleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeclaringType> for String {
    fn from(value: DeclaringType) -> Self {
        value.qualified_name()
    }
}

pub(super) fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Resolved type of a field.
///
/// Generic arguments and array dimensions are kept apart from the erased
/// name so resolvers can match on each. `supertypes` lists every type the
/// erased name is assignable to, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    name: String,
    arguments: Vec<DeclaredType>,
    dimensions: usize,
    supertypes: BTreeSet<String>,
}

impl DeclaredType {
    /// Creates a non-generic, non-array type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            dimensions: 0,
            supertypes: BTreeSet::new(),
        }
    }

    /// Replaces the generic arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<Self>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Replaces the number of array dimensions.
    #[must_use]
    pub const fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Adds supertypes of the erased name.
    #[must_use]
    pub fn with_supertypes<I, S>(mut self, supertypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supertypes.extend(supertypes.into_iter().map(Into::into));
        self
    }

    /// Attaches supertypes from `hierarchy` to this type and, recursively, to
    /// its generic arguments.
    #[must_use]
    pub fn with_hierarchy(mut self, hierarchy: &BTreeMap<String, BTreeSet<String>>) -> Self {
        if let Some(parents) = hierarchy.get(&self.name) {
            self.supertypes.extend(parents.iter().cloned());
        }
        self.arguments = self
            .arguments
            .into_iter()
            .map(|argument| argument.with_hierarchy(hierarchy))
            .collect();
        self
    }

    /// Erased qualified name, without generics or array brackets.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generic arguments in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[Self] {
        &self.arguments
    }

    /// Number of array dimensions; zero for non-arrays.
    #[must_use]
    pub const fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Reports whether the type is an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.dimensions > 0
    }

    /// Supertypes of the erased name.
    #[must_use]
    pub const fn supertypes(&self) -> &BTreeSet<String> {
        &self.supertypes
    }

    /// Component type of an array, one dimension removed.
    #[must_use]
    pub fn component(&self) -> Option<Self> {
        self.is_array().then(|| {
            let mut component = self.clone();
            component.dimensions -= 1;
            component
        })
    }

    /// Reports whether a non-array value of this type is assignable to
    /// `ancestor`.
    #[must_use]
    pub fn is_subtype_of(&self, ancestor: &str) -> bool {
        !self.is_array() && (self.name == ancestor || self.supertypes.contains(ancestor))
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("<")?;
            for (index, argument) in self.arguments.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{argument}")?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl FromStr for DeclaredType {
    type Err = IcicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeParser::new(s).parse()
    }
}
