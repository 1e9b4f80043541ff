//! # Metadata Client
//!
//! The client ties the composer to a [`Transport`] and implements every
//! operation against the remote service. Each public method issues at most
//! one request, fully consumes the response, and decodes failures the same
//! way:
//!
//! - a transport failure is returned as is,
//! - a non-OK status with a structured body becomes `Error::RemoteRejection`,
//! - a non-OK status with any other body becomes `Error::Decode`, carrying the
//!   raw body.
//!
//! ## Apply
//!
//! [`MetadataClient::apply_metadata`] builds the canonical document and sends
//! it as exactly one `bulk` request holding `clear_metadata` followed by
//! `replace_metadata`. The service runs both in one transaction, so an OK
//! response means the whole document is live and nothing is read back.
//!
//! When the service rejects the request with a path, that path addresses a
//! node inside the bulk envelope (e.g. `$.args[1].args.tables[0]`). The client
//! re-serializes the exact request it sent, resolves the path in it, and
//! attaches the located node to the rejection as the offending object.

use log::{debug, info};
use serde_json::Value as JsonValue;

use crate::composer::Composer;
use crate::document::Document;
use crate::error::{Error, Rejection, Result};
use crate::filesystem::MemoryFS;
use crate::path;
use crate::protocol::{InconsistentMetadata, Query, RemoteError};
use crate::transport::{Response, Transport};

/// Synchronizes composed metadata with the remote service.
pub struct MetadataClient {
    transport: Box<dyn Transport>,
    composer: Composer,
}

impl MetadataClient {
    pub fn new(transport: Box<dyn Transport>, composer: Composer) -> Self {
        Self {
            transport,
            composer,
        }
    }

    /// The composer holding the registered plugins.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Send one query and return the body of an OK response.
    fn send(&self, query: &Query) -> Result<Vec<u8>> {
        let response = self.transport.send(query).inspect_err(|err| {
            debug!("{} failed: {}", query.kind, err);
        })?;
        debug!("response: {}", response.body_text());

        if response.is_ok() {
            Ok(response.body)
        } else {
            Err(decode_failure(&response))
        }
    }

    /// Fetch the remote metadata as a document.
    pub fn fetch_metadata(&self) -> Result<Document> {
        let body = self.send(&Query::export_metadata())?;
        Document::from_json_slice(&body).map_err(|err| Error::Decode {
            message: err.to_string(),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    /// Fetch the remote metadata and fan it out into fragment files.
    pub fn export_metadata(&self) -> Result<MemoryFS> {
        let metadata = self.fetch_metadata()?;
        let files = self.composer.export_files(&metadata)?;
        info!("exported metadata into {} files", files.len());
        Ok(files)
    }

    /// Compose the canonical document from the local fragments.
    pub fn build_metadata(&self) -> Result<Document> {
        self.composer.build_metadata()
    }

    /// Build the local fragments and apply them as one transaction.
    pub fn apply_metadata(&self) -> Result<()> {
        let metadata = self.build_metadata()?;
        self.apply_document(&metadata)
    }

    /// Replace the remote metadata with `metadata` as one transaction.
    pub fn apply_document(&self, metadata: &Document) -> Result<()> {
        let query = Query::bulk(vec![
            Query::clear_metadata(),
            Query::replace_metadata(metadata.to_json_value()?),
        ]);

        match self.send(&query) {
            Ok(_) => {
                info!("applied metadata ({} top-level keys)", metadata.len());
                Ok(())
            }
            Err(Error::RemoteRejection(mut rejection)) => {
                if let Some(path) = &rejection.path {
                    rejection.offending_object = offending_object(&query, path);
                }
                Err(Error::RemoteRejection(rejection))
            }
            Err(err) => Err(err),
        }
    }

    /// Clear all remote metadata.
    pub fn reset_metadata(&self) -> Result<()> {
        self.send(&Query::clear_metadata())?;
        info!("metadata cleared");
        Ok(())
    }

    /// Ask the service to reload its metadata from its own store.
    pub fn reload_metadata(&self) -> Result<()> {
        self.send(&Query::reload_metadata())?;
        info!("metadata reloaded");
        Ok(())
    }

    /// Report whether the remote metadata is consistent, and which objects are not.
    pub fn get_inconsistent_metadata(&self) -> Result<InconsistentMetadata> {
        let body = self.send(&Query::get_inconsistent_metadata())?;
        serde_json::from_slice(&body).map_err(|err| Error::Decode {
            message: err.to_string(),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    /// Drop every inconsistent object from the remote metadata.
    pub fn drop_inconsistent_metadata(&self) -> Result<()> {
        self.send(&Query::drop_inconsistent_metadata())?;
        info!("inconsistent metadata dropped");
        Ok(())
    }

    /// Forward `args` verbatim as the arguments of a `bulk` request.
    ///
    /// Returns the response body, parsed as JSON when possible.
    pub fn query(&self, args: JsonValue) -> Result<JsonValue> {
        let body = self.send(&Query::raw_bulk(args))?;
        Ok(serde_json::from_slice(&body)
            .unwrap_or_else(|_| JsonValue::String(String::from_utf8_lossy(&body).into_owned())))
    }
}

/// Decode the body of a non-OK response.
fn decode_failure(response: &Response) -> Error {
    match serde_json::from_slice::<RemoteError>(&response.body) {
        Ok(remote) => Error::RemoteRejection(Rejection::from(remote)),
        Err(err) => Error::Decode {
            message: err.to_string(),
            body: response.body_text(),
        },
    }
}

/// Locate `path` inside the transmitted request and pretty-print the node.
fn offending_object(query: &Query, path: &str) -> Option<String> {
    let sent = match serde_json::to_value(query) {
        Ok(sent) => sent,
        Err(err) => {
            debug!("cannot re-serialize request to resolve {}: {}", path, err);
            return None;
        }
    };
    let node = match path::lookup(&sent, path) {
        Ok(node) => node,
        Err(err) => {
            debug!("offending object not found: {}", err);
            return None;
        }
    };
    serde_json::to_string_pretty(node)
        .inspect_err(|err| debug!("cannot render offending object: {}", err))
        .ok()
}
