//! Filesystem artifact sink.

use std::io::{self, BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use icicle::{ArtifactSink, DeclaringType, HelperName};
use indexmap::IndexMap;

use crate::error::GenError;

/// Writes helpers as `<root>/<package path>/<class>.java`.
///
/// Files left by earlier runs are truncated and rewritten. Within one
/// process each artifact can be created only once; a second attempt fails
/// with [`io::ErrorKind::AlreadyExists`].
///
/// Java class names flatten nesting, so the top-level `a.Outer$Inner` and
/// the nested `a.Outer.Inner` share one file. The second of two such
/// artifacts is refused with the same error kind and a message naming the
/// artifact that owns the file.
#[derive(Debug)]
pub struct DirSink {
    root: Utf8PathBuf,
    dir: Dir,
    created: IndexMap<Utf8PathBuf, String>,
}

impl DirSink {
    /// Opens `root`, creating it and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Io`] if the directory cannot be created or opened.
    pub fn open(root: &Utf8Path) -> Result<Self, GenError> {
        Ok(Self {
            root: root.to_path_buf(),
            dir: ensure_dir(root)?,
            created: IndexMap::new(),
        })
    }

    /// Root of the generated tree.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Paths of the files created so far, relative to [`Self::root`].
    pub fn created(&self) -> impl Iterator<Item = &Utf8Path> {
        self.created.keys().map(Utf8PathBuf::as_path)
    }

    /// Location of `helper` relative to the root.
    #[must_use]
    pub fn relative_path(helper: &HelperName, anchor: &DeclaringType) -> Utf8PathBuf {
        let mut path: Utf8PathBuf = anchor
            .package()
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        path.push(format!("{}.java", helper.class_name()));
        path
    }
}

impl ArtifactSink for DirSink {
    fn create(
        &mut self,
        helper: &HelperName,
        anchor: &DeclaringType,
    ) -> io::Result<Box<dyn Write + '_>> {
        let relative = Self::relative_path(helper, anchor);
        if let Some(owner) = self.created.get(&relative) {
            let path = self.root.join(&relative);
            let message = if owner == helper.artifact() {
                format!("{path} was already generated in this run")
            } else {
                format!("{path} is already used by {owner}")
            };
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, message));
        }
        if let Some(parent) = relative.parent()
            && !parent.as_str().is_empty()
        {
            self.dir.create_dir_all(parent)?;
        }
        let file = self.dir.open_with(
            &relative,
            OpenOptions::new().write(true).create(true).truncate(true),
        )?;
        tracing::debug!(path = %self.root.join(&relative), "created helper file");
        self.created.insert(relative, helper.artifact().to_owned());
        Ok(Box::new(BufWriter::new(file)))
    }
}

fn ensure_dir(path: &Utf8Path) -> Result<Dir, GenError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority()).map_err(GenError::io(path))?;
            Dir::open_ambient_dir(path, ambient_authority()).map_err(GenError::io(path))
        }
        Err(open_err) => Err(GenError::io(path)(open_err)),
    }
}
