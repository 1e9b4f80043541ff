//! # Metasync Library
//!
//! This library composes a declarative metadata document out of fragments
//! owned by independent plugins, applies it to a remote metadata service as
//! one atomic transaction, and explains failures by pointing at the node of
//! the submitted request the service rejected. It is designed to be used by
//! the `metasync` command-line tool but can also be embedded with a custom
//! [`transport::Transport`] or custom [`plugins::MetadataPlugin`]s.
//!
//! ## Quick Example
//!
//! ```
//! use metasync::document::{Document, Value};
//! use metasync::path;
//!
//! // Documents keep keys in insertion order and reject duplicates
//! let mut metadata = Document::new();
//! metadata.set("version", Value::from(2)).unwrap();
//! metadata.set("tables", Value::Sequence(vec![])).unwrap();
//! assert!(metadata.set("version", Value::from(3)).is_err());
//! assert_eq!(metadata.keys().collect::<Vec<_>>(), vec!["version", "tables"]);
//!
//! // Paths reported by the service resolve against the wire form
//! let wire = metadata.to_json_value().unwrap();
//! assert_eq!(path::lookup(&wire, "$.version").unwrap(), 2);
//! ```
//!
//! ## Core Concepts
//!
//! - **Documents (`document`)**: The ordered, duplicate-free canonical
//!   representation, convertible losslessly to YAML and wire JSON.
//! - **Plugins (`plugins`)**: Each plugin owns a slice of the document and can
//!   `export` it to files or `build` it back from its local fragment.
//! - **Composer (`composer`)**: Runs every plugin in registration order, in
//!   either direction.
//! - **Client (`client`)**: Implements the remote operations (export, apply,
//!   reset, reload, inconsistency handling, raw queries) over a
//!   [`transport::Transport`].
//! - **Path resolution (`path`)**: Locates the offending node of a rejected
//!   request.
//!
//! ## Apply Flow
//!
//! 1.  **Build**: Every plugin merges its fragment into one document.
//! 2.  **Serialize**: The document is converted to wire JSON.
//! 3.  **Submit**: `clear_metadata` and `replace_metadata` are sent as one
//!     `bulk` request.
//! 4.  **Diagnose**: On rejection, the error path is resolved against the
//!     exact request that was sent and the offending node is attached.

pub mod client;
pub mod composer;
pub mod config;
pub mod defaults;
pub mod document;
pub mod error;
pub mod filesystem;
pub mod output;
pub mod path;
pub mod plugins;
pub mod protocol;
pub mod suggestions;
pub mod transport;

#[cfg(test)]
mod document_proptest;
#[cfg(test)]
mod path_proptest;
