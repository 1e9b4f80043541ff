//! Default values for metasync configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Name of the configuration file looked up in the current directory.
///
/// This can be overridden by the `-c/--config` CLI flag or the
/// `METASYNC_CONFIG` environment variable.
pub const DEFAULT_CONFIG_FILENAME: &str = ".metasync.yaml";

/// Directory holding the metadata fragments, relative to the config file.
pub const DEFAULT_METADATA_DIRECTORY: &str = "metadata";

/// Returns the default config file path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILENAME)
}

/// Returns the default metadata directory.
pub fn default_metadata_directory() -> PathBuf {
    PathBuf::from(DEFAULT_METADATA_DIRECTORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_is_relative() {
        let path = default_config_path();
        assert!(path.is_relative());
        assert_eq!(path, PathBuf::from(".metasync.yaml"));
    }

    #[test]
    fn test_default_metadata_directory() {
        assert!(default_metadata_directory().ends_with("metadata"));
    }
}
