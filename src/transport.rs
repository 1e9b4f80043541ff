//! Request transport to the remote metadata service
//!
//! A [`Transport`] sends one operation object and hands back the raw status
//! and body. It never retries and never interprets the body; decoding is the
//! client's job, so every transport gets the same failure handling.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::Query;

/// Header carrying the admin secret, when one is configured.
pub const ADMIN_SECRET_HEADER: &str = "X-Hasura-Admin-Secret";

/// Path of the query endpoint, relative to the service root.
pub const QUERY_PATH: &str = "v1/query";

/// Raw response of the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the service accepted the request (HTTP 200).
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one operation to the remote service, synchronously.
pub trait Transport {
    /// Send `query` and return the status and full body.
    ///
    /// Fails with `Error::Transport` when the request cannot be sent or the
    /// response cannot be read. Non-OK statuses are not errors here.
    fn send(&self, query: &Query) -> Result<Response>;
}

/// HTTP transport posting JSON to `<endpoint>/v1/query`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
    admin_secret: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the service rooted at `endpoint`.
    pub fn new(endpoint: &Url, admin_secret: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let url = query_url(endpoint)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| Error::Transport {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            url,
            admin_secret,
        })
    }

    /// The full URL requests are posted to.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Resolve the query endpoint below `endpoint`, keeping any base path.
fn query_url(endpoint: &Url) -> Result<Url> {
    let mut base = endpoint.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(QUERY_PATH).map_err(|e| Error::Transport {
        message: format!("Invalid endpoint '{}': {}", endpoint, e),
    })
}

impl Transport for HttpTransport {
    fn send(&self, query: &Query) -> Result<Response> {
        let body = serde_json::to_vec(query).map_err(|e| Error::Serialization {
            message: format!("cannot serialize '{}' request: {}", query.kind, e),
        })?;
        debug!("POST {} ({})", self.url, query.kind);

        let mut request = self
            .client
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(secret) = &self.admin_secret {
            request = request.header(ADMIN_SECRET_HEADER, secret);
        }

        let response = request.send().map_err(|e| Error::Transport {
            message: format!("{} request to {} failed: {}", query.kind, self.url, e),
        })?;
        let status = response.status().as_u16();
        let bytes = response.bytes().map_err(|e| Error::Transport {
            message: format!("Failed to read response from {}: {}", self.url, e),
        })?;

        Ok(Response::new(status, bytes.to_vec()))
    }
}
