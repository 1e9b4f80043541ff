//! Plugin owning a single top-level key persisted as `<key>.yaml`.

use std::path::{Path, PathBuf};

use log::debug;

use super::{read_fragment, render_fragment, MetadataPlugin};
use crate::document::{value_kind, Document, Value};
use crate::error::{Error, Result};
use crate::filesystem::{File, MemoryFS};

/// The kind of value a [`KeyFilePlugin`] stores under its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// A list of objects, e.g. tracked tables.
    Sequence,
    /// A mapping, e.g. custom type definitions.
    Mapping,
}

impl ValueShape {
    fn empty(self) -> Value {
        match self {
            ValueShape::Sequence => Value::Sequence(Vec::new()),
            ValueShape::Mapping => Value::Mapping(Default::default()),
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            ValueShape::Sequence => value.is_sequence(),
            ValueShape::Mapping => value.is_mapping(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ValueShape::Sequence => "sequence",
            ValueShape::Mapping => "mapping",
        }
    }
}

/// Owns one top-level key whose whole value lives in one fragment file.
///
/// An absent key exports as the empty value of its shape, so every managed
/// file exists after an export. A missing file contributes nothing on build.
#[derive(Debug, Clone)]
pub struct KeyFilePlugin {
    key: String,
    file_name: String,
    shape: ValueShape,
    metadata_dir: PathBuf,
}

impl KeyFilePlugin {
    /// Create a plugin for `key`, persisted as `<key>.yaml` in `metadata_dir`.
    pub fn new(key: &str, shape: ValueShape, metadata_dir: &Path) -> Self {
        Self {
            key: key.to_string(),
            file_name: format!("{}.yaml", key),
            shape,
            metadata_dir: metadata_dir.to_path_buf(),
        }
    }

    /// The fragment file name, relative to the metadata directory.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl MetadataPlugin for KeyFilePlugin {
    fn name(&self) -> &str {
        &self.key
    }

    fn export(&self, metadata: &Document) -> Result<MemoryFS> {
        let value = match metadata.get(&self.key) {
            None | Some(Value::Null) => self.shape.empty(),
            Some(value) if self.shape.matches(value) => value.clone(),
            Some(other) => {
                return Err(Error::Fragment {
                    file: self.file_name.clone(),
                    message: format!(
                        "expected '{}' to be a {}, found {}",
                        self.key,
                        self.shape.describe(),
                        value_kind(other)
                    ),
                })
            }
        };

        let mut files = MemoryFS::new();
        files.add_file(&self.file_name, File::new(render_fragment(&value)?));
        Ok(files)
    }

    fn build(&self, metadata: &mut Document) -> Result<()> {
        let value = match read_fragment(&self.metadata_dir, &self.file_name)? {
            None | Some(Value::Null) => {
                debug!("{}: no fragment in {}", self.key, self.file_name);
                return Ok(());
            }
            Some(value) => value,
        };

        if !self.shape.matches(&value) {
            return Err(Error::Fragment {
                file: self.metadata_dir.join(&self.file_name).display().to_string(),
                message: format!(
                    "expected a {}, found {}",
                    self.shape.describe(),
                    value_kind(&value)
                ),
            });
        }

        metadata.set(self.key.clone(), value)
    }
}
