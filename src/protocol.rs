//! Wire types exchanged with the remote metadata service.
//!
//! Every operation is a JSON object `{"type": ..., "args": ...}`. Operations
//! without arguments send `args: {}`; `bulk` carries an ordered array of
//! nested operations which the service executes as one transaction.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::error::Rejection;

/// One named operation sent to the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "type")]
    pub kind: String,
    pub args: JsonValue,
}

impl Query {
    /// An operation with explicit arguments.
    pub fn new(kind: impl Into<String>, args: JsonValue) -> Self {
        Self {
            kind: kind.into(),
            args,
        }
    }

    fn no_args(kind: &str) -> Self {
        Self::new(kind, json!({}))
    }

    pub fn export_metadata() -> Self {
        Self::no_args("export_metadata")
    }

    pub fn clear_metadata() -> Self {
        Self::no_args("clear_metadata")
    }

    pub fn reload_metadata() -> Self {
        Self::no_args("reload_metadata")
    }

    pub fn get_inconsistent_metadata() -> Self {
        Self::no_args("get_inconsistent_metadata")
    }

    pub fn drop_inconsistent_metadata() -> Self {
        Self::no_args("drop_inconsistent_metadata")
    }

    /// Replace the whole remote state with `metadata` (wire JSON).
    pub fn replace_metadata(metadata: JsonValue) -> Self {
        Self::new("replace_metadata", metadata)
    }

    /// Wrap `queries` into one transactional request, keeping their order.
    pub fn bulk(queries: Vec<Query>) -> Self {
        let args = queries
            .into_iter()
            .map(|q| json!({ "type": q.kind, "args": q.args }))
            .collect();
        Self::new("bulk", JsonValue::Array(args))
    }

    /// Forward an arbitrary payload as the `args` of a bulk request.
    pub fn raw_bulk(args: JsonValue) -> Self {
        Self::new("bulk", args)
    }
}

/// Error body the remote service returns with a non-OK status.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteError {
    #[serde(alias = "error")]
    pub message: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl From<RemoteError> for Rejection {
    fn from(err: RemoteError) -> Self {
        Rejection {
            message: err.message,
            code: err.code,
            // An empty path carries no location
            path: err.path.filter(|p| !p.is_empty()),
            offending_object: None,
        }
    }
}

/// Response of `get_inconsistent_metadata`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InconsistentMetadata {
    pub is_consistent: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub inconsistent_objects: Vec<InconsistentObject>,
}

/// An explicit `null` list reads the same as an absent one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<InconsistentObject>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<InconsistentObject>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A metadata object the remote service could not apply consistently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InconsistentObject {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub definition: JsonValue,
    /// Every other field the service reported, passed through untouched.
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

impl InconsistentObject {
    /// Short human-readable name of the object, taken from its definition.
    pub fn name(&self) -> String {
        match &self.definition {
            JsonValue::String(s) => s.clone(),
            JsonValue::Object(map) => {
                for key in ["name", "table", "function"] {
                    match map.get(key) {
                        Some(JsonValue::String(s)) => return s.clone(),
                        Some(JsonValue::Object(inner)) => {
                            let schema = inner.get("schema").and_then(JsonValue::as_str);
                            let name = inner.get("name").and_then(JsonValue::as_str);
                            if let (Some(schema), Some(name)) = (schema, name) {
                                return format!("{}.{}", schema, name);
                            }
                        }
                        _ => {}
                    }
                }
                self.reported_name()
                    .unwrap_or_else(|| self.definition.to_string())
            }
            JsonValue::Null => self.reported_name().unwrap_or_else(|| "-".to_string()),
            other => other.to_string(),
        }
    }

    fn reported_name(&self) -> Option<String> {
        self.extra
            .get("name")
            .and_then(JsonValue::as_str)
            .map(str::to_string)
    }
}

impl fmt::Display for InconsistentObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.kind.as_deref().unwrap_or("unknown"),
            self.name(),
            self.reason.as_deref().unwrap_or("no reason given")
        )
    }
}
