//! Shared setup for commands that talk to the metadata service

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;

use metasync::client::MetadataClient;
use metasync::composer::Composer;
use metasync::config::{self, Config};
use metasync::defaults::default_config_path;
use metasync::output::OutputConfig;
use metasync::suggestions;
use metasync::transport::HttpTransport;

use crate::cli::GlobalArgs;

/// Effective configuration of one command invocation
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub output: OutputConfig,
}

impl Context {
    /// Load the config file and apply the global flag overrides.
    ///
    /// A missing default config file is tolerated when `--endpoint` is given;
    /// an explicitly requested one must exist.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let explicit = global.config.is_some();
        let config_path = global.config.clone().unwrap_or_else(default_config_path);

        let mut config = if config_path.exists() {
            debug!("loading config from {}", config_path.display());
            config::from_file(&config_path).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to load config from {}: {}",
                    config_path.display(),
                    e
                )
            })?
        } else {
            match (&global.endpoint, explicit) {
                (Some(endpoint), false) => Config::new(endpoint.clone()),
                _ => return Err(suggestions::config_not_found(&config_path)),
            }
        };

        if let Some(endpoint) = &global.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(secret) = &global.admin_secret {
            config.admin_secret = Some(secret.clone());
        }
        if let Some(dir) = &global.metadata_dir {
            config.metadata_directory = dir.clone();
        }
        config.validate()?;

        Ok(Self {
            config,
            output: OutputConfig::from_env_and_flag(&global.color),
        })
    }

    /// Directory holding the metadata fragments.
    pub fn metadata_dir(&self) -> &Path {
        &self.config.metadata_directory
    }

    /// Build an HTTP client with the configured plugins.
    pub fn client(&self) -> Result<MetadataClient> {
        let transport = HttpTransport::new(
            &self.config.endpoint_url()?,
            self.config.admin_secret.clone(),
            self.config.timeout(),
        )?;
        debug!("sending requests to {}", transport.url());
        let composer = Composer::new(self.config.build_plugins()?);
        Ok(MetadataClient::new(Box::new(transport), composer))
    }
}

/// Resolve an optional output directory against the configured metadata directory.
pub fn output_dir(context: &Context, override_dir: Option<PathBuf>) -> PathBuf {
    override_dir.unwrap_or_else(|| context.metadata_dir().to_path_buf())
}
