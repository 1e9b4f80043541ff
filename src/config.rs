//! # Configuration Schema and Parsing
//!
//! This module defines the `.metasync.yaml` configuration file and the logic
//! for parsing and validating it.
//!
//! ```yaml
//! endpoint: http://localhost:8080
//! admin_secret: s3cret
//! metadata_directory: metadata
//! timeout_secs: 30
//! plugins: [version, tables, functions]
//! ```
//!
//! Only `endpoint` is required. `metadata_directory` defaults to `metadata`
//! and, when loaded through [`from_file`], a relative directory is resolved
//! against the directory containing the config file. `plugins` selects and
//! orders a subset of the built-in plugins; when omitted every built-in
//! plugin is registered in its default order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::default_metadata_directory;
use crate::error::{Error, Result};
use crate::plugins::{self, MetadataPlugin, PLUGIN_NAMES};

/// Parsed contents of `.metasync.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root URL of the remote metadata service.
    pub endpoint: String,
    /// Admin secret sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_secret: Option<String>,
    /// Directory holding the metadata fragments.
    #[serde(default = "default_metadata_directory")]
    pub metadata_directory: PathBuf,
    /// HTTP timeout in seconds; no timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Plugins to register, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<String>>,
}

impl Config {
    /// A configuration with every other field at its default.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            admin_secret: None,
            metadata_directory: default_metadata_directory(),
            timeout_secs: None,
            plugins: None,
        }
    }

    /// Check the endpoint and plugin list.
    pub fn validate(&self) -> Result<()> {
        self.endpoint_url()?;
        if let Some(names) = &self.plugins {
            if names.is_empty() {
                return Err(Error::ConfigParse {
                    message: "'plugins' must not be empty".to_string(),
                    hint: Some("Remove the key to register every built-in plugin".to_string()),
                });
            }
            plugins::registry(&self.metadata_directory, names)?;
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::ConfigParse {
                message: "'timeout_secs' must be greater than zero".to_string(),
                hint: Some("Remove the key to disable the timeout".to_string()),
            });
        }
        Ok(())
    }

    /// The endpoint as a URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::ConfigParse {
                message: "'endpoint' must not be empty".to_string(),
                hint: Some("Set it to the service root, e.g. http://localhost:8080".to_string()),
            });
        }
        Url::parse(endpoint).map_err(|e| Error::ConfigParse {
            message: format!("Invalid endpoint '{}': {}", endpoint, e),
            hint: Some("Include the scheme, e.g. http://localhost:8080".to_string()),
        })
    }

    /// The HTTP timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Names of the plugins to register, in order.
    pub fn plugin_names(&self) -> Vec<String> {
        match &self.plugins {
            Some(names) => names.clone(),
            None => PLUGIN_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Construct the configured plugins, reading from the metadata directory.
    pub fn build_plugins(&self) -> Result<Vec<Box<dyn MetadataPlugin>>> {
        plugins::registry(&self.metadata_directory, &self.plugin_names())
    }
}

/// Parse and validate a configuration from a YAML string.
pub fn parse(yaml_content: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some(
            "Known keys: endpoint, admin_secret, metadata_directory, timeout_secs, plugins"
                .to_string(),
        ),
    })?;
    config.validate()?;
    Ok(config)
}

/// Load a configuration file, resolving the metadata directory against its location.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    let mut config = parse(&content)?;
    if config.metadata_directory.is_relative() {
        if let Some(parent) = path.parent() {
            config.metadata_directory = parent.join(&config.metadata_directory);
        }
    }
    Ok(config)
}
