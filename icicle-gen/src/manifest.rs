//! JSON round manifests.
//!
//! A manifest lists the candidate fields of one round together with the
//! supertypes of any user type those fields mention:
//!
//! ```json
//! {
//!   "hierarchy": { "com.example.User": ["android.os.Parcelable"] },
//!   "elements": [
//!     { "enclosing": "com.example.Foo", "name": "user",
//!       "type": "com.example.User", "modifiers": [] }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use icicle::{DeclaredType, DeclaringType, Element, IcicleError, Modifiers, Round};
use serde::Deserialize;

use crate::error::GenError;

/// Direct or transitive supertypes keyed by erased type name.
pub type Hierarchy = BTreeMap<String, BTreeSet<String>>;

/// Contents of one manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Declared supertypes; closed transitively before use.
    #[serde(default)]
    pub hierarchy: Hierarchy,
    /// Candidate fields in encounter order.
    #[serde(default)]
    pub elements: Vec<ManifestElement>,
}

/// One candidate field as written in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestElement {
    /// Qualified name of the declaring type.
    pub enclosing: DeclaringType,
    /// Field name.
    pub name: String,
    /// Textual field type, such as `java.util.ArrayList<java.lang.String>`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Modifier keywords.
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl ManifestElement {
    fn into_element(self, hierarchy: &Hierarchy) -> Result<Element, IcicleError> {
        let ty = self.ty.parse::<DeclaredType>()?.with_hierarchy(hierarchy);
        Ok(Element::new(self.enclosing, self.name, ty).with_modifiers(self.modifiers.iter()))
    }
}

impl Manifest {
    /// Reads and parses the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Io`] if the file cannot be read and
    /// [`GenError::Manifest`] if it is not a valid manifest.
    pub fn load(path: &Utf8Path) -> Result<Self, GenError> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| GenError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
            })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(GenError::io(parent))?;
        let text = dir.read_to_string(file_name).map_err(GenError::io(path))?;
        serde_json::from_str(&text).map_err(|source| GenError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Hierarchy with every type mapped to all of its ancestors.
    ///
    /// Cycles are tolerated; a type never lists itself.
    #[must_use]
    pub fn closed_hierarchy(&self) -> Hierarchy {
        self.hierarchy
            .keys()
            .map(|ty| (ty.clone(), self.ancestors(ty)))
            .collect()
    }

    fn ancestors(&self, ty: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut pending: Vec<&str> = vec![ty];
        while let Some(current) = pending.pop() {
            for parent in self.hierarchy.get(current).into_iter().flatten() {
                if parent != ty && seen.insert(parent.clone()) {
                    pending.push(parent.as_str());
                }
            }
        }
        seen
    }

    /// Converts the manifest into a processing round.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Element`] naming `path` if any element's type
    /// does not parse.
    pub fn into_round(self, path: &Utf8Path, is_final: bool) -> Result<Round, GenError> {
        let hierarchy = self.closed_hierarchy();
        let elements = self
            .elements
            .into_iter()
            .map(|element| element.into_element(&hierarchy))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| GenError::Element {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(if is_final {
            Round::last(elements)
        } else {
            Round::new(elements)
        })
    }
}
