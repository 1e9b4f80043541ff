//! # Metadata Plugins
//!
//! Each plugin owns one logical slice of the metadata document and knows how
//! to carve that slice out of the canonical document (`export`) or merge its
//! locally persisted fragment into it (`build`).
//!
//! ## Contract
//!
//! - Plugins are stateless with respect to the document: every call receives
//!   the full canonical document and touches only the plugin's own keys.
//! - `export` never mutates its input.
//! - `build` appends to the shared document and fails on a key another plugin
//!   already contributed.
//! - `name` is stable; the composer uses it to attribute failures.
//!
//! ## Registry
//!
//! Plugins are registered once, in the order of [`PLUGIN_NAMES`]. That order is
//! the build and export iteration order, so it is also the top-level key order
//! of every composed document. A configuration may select a subset and reorder
//! it through [`registry`].

mod key_file;
mod version;

pub use key_file::{KeyFilePlugin, ValueShape};
pub use version::VersionPlugin;

use std::fs;
use std::io;
use std::path::Path;

use crate::document::{Document, Value};
use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;
use crate::suggestions;

/// The capability interface every metadata source implements.
pub trait MetadataPlugin {
    /// Stable identifier used in error messages and diagnostics.
    fn name(&self) -> &str;

    /// Extract this plugin's slice of `metadata` into named files.
    fn export(&self, metadata: &Document) -> Result<MemoryFS>;

    /// Merge this plugin's local fragment into `metadata`.
    fn build(&self, metadata: &mut Document) -> Result<()>;

    /// Top-level document keys this plugin exports. Defaults to its name.
    fn owned_keys(&self) -> Vec<&str> {
        vec![self.name()]
    }
}

/// Names of the built-in plugins, in registration order.
pub const PLUGIN_NAMES: &[&str] = &[
    "version",
    "tables",
    "functions",
    "remote_schemas",
    "query_collections",
    "allowlist",
    "actions",
    "custom_types",
    "cron_triggers",
];

/// Construct the built-in plugin called `name`, reading fragments from `metadata_dir`.
pub fn by_name(name: &str, metadata_dir: &Path) -> Option<Box<dyn MetadataPlugin>> {
    let plugin: Box<dyn MetadataPlugin> = match name {
        "version" => Box::new(VersionPlugin::new(metadata_dir)),
        "custom_types" => Box::new(KeyFilePlugin::new(name, ValueShape::Mapping, metadata_dir)),
        "tables" | "functions" | "remote_schemas" | "query_collections" | "allowlist"
        | "actions" | "cron_triggers" => {
            Box::new(KeyFilePlugin::new(name, ValueShape::Sequence, metadata_dir))
        }
        _ => return None,
    };
    Some(plugin)
}

/// Every built-in plugin, in registration order.
pub fn default_registry(metadata_dir: &Path) -> Vec<Box<dyn MetadataPlugin>> {
    PLUGIN_NAMES
        .iter()
        .filter_map(|name| by_name(name, metadata_dir))
        .collect()
}

/// The named built-in plugins, in the given order.
///
/// # Errors
///
/// Returns `Error::ConfigParse` for an unknown or repeated plugin name.
pub fn registry(metadata_dir: &Path, names: &[String]) -> Result<Vec<Box<dyn MetadataPlugin>>> {
    let mut plugins: Vec<Box<dyn MetadataPlugin>> = Vec::with_capacity(names.len());
    for name in names {
        if plugins.iter().any(|p| p.name() == name) {
            return Err(Error::ConfigParse {
                message: format!("Plugin '{}' is listed more than once", name),
                hint: Some("Each plugin may be registered only once".to_string()),
            });
        }
        let plugin = by_name(name, metadata_dir).ok_or_else(|| Error::ConfigParse {
            message: format!("Unknown plugin '{}'", name),
            hint: Some(suggestions::unknown_plugin_hint(name)),
        })?;
        plugins.push(plugin);
    }
    Ok(plugins)
}

/// Read and parse a YAML fragment. A missing file yields `None`.
pub(crate) fn read_fragment(metadata_dir: &Path, file_name: &str) -> Result<Option<Value>> {
    let path = metadata_dir.join(file_name);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(Error::Fragment {
                file: path.display().to_string(),
                message: err.to_string(),
            })
        }
    };
    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|err| Error::Fragment {
            file: path.display().to_string(),
            message: err.to_string(),
        })
}

/// Render a value as a YAML fragment file.
pub(crate) fn render_fragment(value: &Value) -> Result<Vec<u8>> {
    serde_yaml::to_string(value)
        .map(String::into_bytes)
        .map_err(|err| Error::Serialization {
            message: format!("cannot render metadata fragment: {}", err),
        })
}
