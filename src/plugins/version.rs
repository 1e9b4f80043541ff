//! The metadata format version, persisted as `version.yaml`.

use std::path::{Path, PathBuf};

use super::{read_fragment, MetadataPlugin};
use crate::document::{value_kind, Document, Value};
use crate::error::{Error, Result};
use crate::filesystem::{File, MemoryFS};

const KEY: &str = "version";
const FILE_NAME: &str = "version.yaml";

/// Owns the `version` key. Unlike the list plugins it is required in both
/// directions: a document or fragment without a version is malformed.
#[derive(Debug, Clone)]
pub struct VersionPlugin {
    metadata_dir: PathBuf,
}

impl VersionPlugin {
    pub fn new(metadata_dir: &Path) -> Self {
        Self {
            metadata_dir: metadata_dir.to_path_buf(),
        }
    }
}

fn check_version(value: &Value, file: &str) -> Result<()> {
    match value {
        Value::Number(_) => Ok(()),
        other => Err(Error::Fragment {
            file: file.to_string(),
            message: format!("'version' must be a number, found {}", value_kind(other)),
        }),
    }
}

impl MetadataPlugin for VersionPlugin {
    fn name(&self) -> &str {
        KEY
    }

    fn export(&self, metadata: &Document) -> Result<MemoryFS> {
        let version = metadata.get(KEY).ok_or_else(|| Error::Fragment {
            file: FILE_NAME.to_string(),
            message: "metadata has no 'version' key".to_string(),
        })?;
        check_version(version, FILE_NAME)?;

        let mut fragment = Document::new();
        fragment.set(KEY, version.clone())?;
        let rendered = fragment.to_yaml_string()?;

        let mut files = MemoryFS::new();
        files.add_file(FILE_NAME, File::from_string(&rendered));
        Ok(files)
    }

    fn build(&self, metadata: &mut Document) -> Result<()> {
        let path = self.metadata_dir.join(FILE_NAME).display().to_string();
        let value = read_fragment(&self.metadata_dir, FILE_NAME)?.ok_or_else(|| {
            Error::Fragment {
                file: path.clone(),
                message: "file not found".to_string(),
            }
        })?;

        let fragment = Document::from_value(value).map_err(|err| Error::Fragment {
            file: path.clone(),
            message: err.to_string(),
        })?;
        let version = fragment.get(KEY).ok_or_else(|| Error::Fragment {
            file: path.clone(),
            message: "missing 'version' key".to_string(),
        })?;
        check_version(version, &path)?;

        metadata.set(KEY, version.clone())
    }
}
