//! Composition of the canonical document from plugin fragments
//!
//! The composer owns the ordered plugin list and runs it in both directions:
//!
//! 1. **Build**: every plugin merges its local fragment into one shared,
//!    growing document, strictly in registration order. The first failure
//!    stops the run; later plugins are never invoked.
//! 2. **Export**: every plugin carves its slice out of a document fetched from
//!    the remote service. The per-plugin file sets are merged into one, with a
//!    later plugin's file replacing an earlier one's under the same name
//!    (plugins are expected to own disjoint file names, so this is logged).
//!    Any failure aborts the export and no partial file set is returned.
//!    Top-level keys no plugin owns are left out and logged.
//!
//! Plugins run one at a time against a document passed by `&mut`, so the
//! duplicate-key invariant holds without any locking.

use std::collections::HashSet;

use log::{debug, warn};

use crate::document::Document;
use crate::error::{Error, PluginPhase, Result};
use crate::filesystem::MemoryFS;
use crate::plugins::MetadataPlugin;

/// Runs the registered plugins in their fixed order.
pub struct Composer {
    plugins: Vec<Box<dyn MetadataPlugin>>,
}

impl Composer {
    /// Create a composer over `plugins`, in registration order.
    pub fn new(plugins: Vec<Box<dyn MetadataPlugin>>) -> Self {
        Self { plugins }
    }

    /// Plugin names in registration order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Build every plugin into `metadata`, stopping at the first failure.
    ///
    /// On error `metadata` holds whatever the earlier plugins contributed. It
    /// is only useful for diagnostics and must not be submitted.
    pub fn build_into(&self, metadata: &mut Document) -> Result<()> {
        for plugin in &self.plugins {
            debug!("building metadata fragment '{}'", plugin.name());
            plugin
                .build(metadata)
                .map_err(|err| Error::plugin(plugin.name(), PluginPhase::Build, err))?;
        }
        Ok(())
    }

    /// Build the canonical document from scratch.
    pub fn build_metadata(&self) -> Result<Document> {
        let mut metadata = Document::new();
        self.build_into(&mut metadata)?;
        Ok(metadata)
    }

    /// Fan `metadata` out into the merged file set of every plugin.
    pub fn export_files(&self, metadata: &Document) -> Result<MemoryFS> {
        let mut merged = MemoryFS::new();
        for plugin in &self.plugins {
            debug!("exporting metadata fragment '{}'", plugin.name());
            let files = plugin
                .export(metadata)
                .map_err(|err| Error::plugin(plugin.name(), PluginPhase::Export, err))?;
            for path in merged.merge(files) {
                warn!(
                    "plugin '{}' overwrote {} exported by an earlier plugin",
                    plugin.name(),
                    path.display()
                );
            }
        }

        let owned: HashSet<&str> = self.plugins.iter().flat_map(|p| p.owned_keys()).collect();
        let unowned: Vec<&str> = metadata.keys().filter(|key| !owned.contains(key)).collect();
        if !unowned.is_empty() {
            warn!(
                "no plugin exports top-level key(s) {}; they are missing from the files and a later apply drops them",
                unowned.join(", ")
            );
        }
        Ok(merged)
    }
}
