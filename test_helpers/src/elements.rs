//! Builders for source-model fixtures.
//!
//! ```
//! use icicle_test_helpers::elements::{ManifestBuilder, field};
//!
//! # fn main() -> anyhow::Result<()> {
//! let count = field("com.example.Foo", "count", "int").build()?;
//! assert_eq!(count.name(), "count");
//!
//! let json = ManifestBuilder::new()
//!     .field("com.example.Foo", "count", "int", &[])
//!     .to_json();
//! assert!(json.contains("com.example.Foo"));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result, anyhow};
use icicle::{DeclaredType, DeclaringType, Element, Modifier, Round};
use serde_json::{Map, Value, json};

/// Starts building a field of `enclosing` named `name` with type `ty`.
#[must_use]
pub fn field(enclosing: &str, name: &str, ty: &str) -> FieldBuilder {
    FieldBuilder {
        enclosing: enclosing.to_owned(),
        name: name.to_owned(),
        ty: ty.to_owned(),
        modifiers: Vec::new(),
        supertypes: Vec::new(),
    }
}

/// Fixture builder for a single [`Element`].
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    enclosing: String,
    name: String,
    ty: String,
    modifiers: Vec<String>,
    supertypes: Vec<String>,
}

impl FieldBuilder {
    /// Sets modifiers by keyword, for example `["private", "static"]`.
    #[must_use]
    pub fn modifiers<const N: usize>(mut self, keywords: [&str; N]) -> Self {
        self.modifiers = keywords.iter().map(|k| (*k).to_owned()).collect();
        self
    }

    /// Declares supertypes of the field's erased type.
    #[must_use]
    pub fn extends<const N: usize>(mut self, supertypes: [&str; N]) -> Self {
        self.supertypes = supertypes.iter().map(|s| (*s).to_owned()).collect();
        self
    }

    /// Builds the element.
    ///
    /// # Errors
    ///
    /// Fails when a name, type or modifier does not parse.
    pub fn build(self) -> Result<Element> {
        let enclosing: DeclaringType = self
            .enclosing
            .parse()
            .with_context(|| format!("parse declaring type {}", self.enclosing))?;
        let ty = self
            .ty
            .parse::<DeclaredType>()
            .with_context(|| format!("parse type {}", self.ty))?
            .with_supertypes(self.supertypes);
        let modifiers = self
            .modifiers
            .iter()
            .map(|keyword| keyword.parse::<Modifier>().map_err(|err| anyhow!(err)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Element::new(enclosing, self.name, ty).with_modifiers(modifiers))
    }
}

/// Builds a round from field fixtures.
///
/// # Errors
///
/// Fails when any fixture does not build.
pub fn round(fields: Vec<FieldBuilder>, is_final: bool) -> Result<Round> {
    let elements = fields
        .into_iter()
        .map(FieldBuilder::build)
        .collect::<Result<Vec<_>>>()?;
    Ok(if is_final {
        Round::last(elements)
    } else {
        Round::new(elements)
    })
}

/// Builder for the JSON round manifests read by `icicle-gen`.
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    hierarchy: Map<String, Value>,
    elements: Vec<Value>,
}

impl ManifestBuilder {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field entry.
    #[must_use]
    pub fn field(mut self, enclosing: &str, name: &str, ty: &str, modifiers: &[&str]) -> Self {
        self.elements.push(json!({
            "enclosing": enclosing,
            "name": name,
            "type": ty,
            "modifiers": modifiers,
        }));
        self
    }

    /// Declares the direct supertypes of `ty`.
    #[must_use]
    pub fn hierarchy(mut self, ty: &str, supertypes: &[&str]) -> Self {
        self.hierarchy.insert(ty.to_owned(), json!(supertypes));
        self
    }

    /// Renders the manifest as JSON text.
    #[must_use]
    pub fn to_json(&self) -> String {
        json!({
            "hierarchy": self.hierarchy,
            "elements": self.elements,
        })
        .to_string()
    }
}
