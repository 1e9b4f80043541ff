//! # Error Handling
//!
//! This module defines the centralized error type for `metasync`. It uses the
//! `thiserror` library to build one `Error` enum that covers every failure the
//! library can surface, so that callers always learn:
//!
//! - what failed (transport, decoding, remote rejection, composition),
//! - which plugin was involved, when one was,
//! - the server's own message, and
//! - where possible, the offending node of the request that was sent.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant carries the context needed to act
//!   on the failure without re-running the operation.
//! - **`Rejection`**: The decoded body of a non-OK response from the remote
//!   service, optionally enriched with the located offending object.
//! - **`PluginPhase`**: Whether a plugin failed while building or exporting.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! None of these errors are retried or swallowed inside the library.

use std::fmt;

use thiserror::Error;

/// The phase a plugin was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginPhase {
    /// Merging the plugin's local fragment into the canonical document.
    Build,
    /// Carving the plugin's slice out of the canonical document.
    Export,
}

impl fmt::Display for PluginPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginPhase::Build => f.write_str("build"),
            PluginPhase::Export => f.write_str("export"),
        }
    }
}

/// A structured rejection returned by the remote service.
///
/// `path` addresses a node inside the request that was transmitted, including
/// the bulk envelope, not inside the plain metadata document.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// The server's own error message.
    pub message: String,
    /// Machine-readable error code, when the server sends one.
    pub code: Option<String>,
    /// Structural path of the failing node within the transmitted request.
    pub path: Option<String>,
    /// Pretty-printed node located at `path`, when the lookup succeeded.
    pub offending_object: Option<String>,
}

impl Rejection {
    /// Create a rejection carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            path: None,
            offending_object: None,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.code {
            write!(f, " (code: {})", code)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(object) = &self.offending_object {
            write!(f, "\n\noffending object:\n{}", object)?;
        }
        Ok(())
    }
}

/// Main error type for metasync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent or its response could not be read.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A response body did not parse as expected.
    ///
    /// The raw body is kept so the failure can be diagnosed without a rerun.
    #[error("Failed to decode response: {message}; response from API: {body}")]
    Decode { message: String, body: String },

    /// The remote service returned a non-OK status with a structured error.
    #[error("Remote service rejected the request: {0}")]
    RemoteRejection(Rejection),

    /// A specific plugin failed while building or exporting its fragment.
    #[error("Plugin '{plugin}' failed during {phase}: {source}")]
    Plugin {
        plugin: String,
        phase: PluginPhase,
        source: Box<Error>,
    },

    /// Two contributions to the same document level used the same key.
    #[error("Duplicate key in metadata document: '{key}'")]
    DuplicateKey { key: String },

    /// A local metadata fragment is missing or malformed.
    #[error("Invalid metadata fragment {file}: {message}")]
    Fragment { file: String, message: String },

    /// Reading or writing metadata files on disk failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// A structural path could not be resolved against a value.
    #[error("Path lookup failed for '{path}': {message}")]
    PathLookup { path: String, message: String },

    /// The `.metasync.yaml` configuration is invalid.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An error occurred during serialization.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an error with the name of the plugin and the phase it failed in.
    pub fn plugin(plugin: impl Into<String>, phase: PluginPhase, source: Error) -> Self {
        Error::Plugin {
            plugin: plugin.into(),
            phase,
            source: Box::new(source),
        }
    }

    /// The remote rejection carried by this error, looking through plugin wrappers.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Error::RemoteRejection(rejection) => Some(rejection),
            Error::Plugin { source, .. } => source.rejection(),
            _ => None,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
