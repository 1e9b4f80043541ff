//! # Ordered Metadata Document
//!
//! The canonical in-memory representation of the whole metadata document.
//!
//! A `Document` behaves like a mapping but remembers insertion order: keys come
//! back from [`Document::keys`] exactly as they were inserted, and both
//! serialization formats reproduce that order. This is what keeps exported
//! fragments and their diffs stable and reviewable.
//!
//! ## Formats
//!
//! - **YAML** (`to_yaml_string` / `from_yaml_str`): the human-edited format of
//!   local fragments.
//! - **JSON** (`to_json_value` / `from_json_slice`): the wire format of the
//!   remote service.
//!
//! Nested values are `serde_yaml::Value`. Its `Mapping` preserves insertion
//! order, and `serde_json` is built with `preserve_order`, so the conversion
//! between the two formats keeps key order, nesting, and scalar typing.
//!
//! ## Duplicate keys
//!
//! [`Document::set`] rejects a key that is already present with
//! [`Error::DuplicateKey`]. Two plugins contributing the same top-level key is
//! a plugin bug and must never be resolved silently.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A value stored in the document.
pub type Value = serde_yaml::Value;

/// An insertion-ordered mapping from top-level keys to metadata values.
#[derive(Debug, Clone, Default)]
pub struct Document {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key` with `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateKey` if `key` is already present. The document
    /// is left unchanged in that case.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateKey { key });
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value.into()));
        Ok(())
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&idx| &self.entries[idx].1)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a document from a parsed YAML value.
    ///
    /// `null` yields an empty document; anything other than a mapping with
    /// string keys is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(mapping) => {
                let mut doc = Self::new();
                for (key, value) in mapping {
                    match key {
                        Value::String(key) => doc.set(key, value)?,
                        other => {
                            return Err(Error::Serialization {
                                message: format!(
                                    "top-level metadata keys must be strings, found {:?}",
                                    other
                                ),
                            })
                        }
                    }
                }
                Ok(doc)
            }
            other => Err(Error::Serialization {
                message: format!(
                    "expected a mapping at the top level of the metadata document, found {}",
                    value_kind(&other)
                ),
            }),
        }
    }

    /// Parse a YAML document. Empty input yields an empty document.
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(input)?;
        Self::from_value(value)
    }

    /// Render the document as YAML, keeping key order.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse a JSON object, rejecting repeated top-level keys.
    pub fn from_json_slice(input: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(input)?)
    }

    /// Convert a JSON value into a document.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Convert the document into the wire representation, keeping key order.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|err| Error::Serialization {
            message: format!("cannot convert metadata to JSON: {}", err),
        })
    }

    /// Serialize the document as compact wire JSON.
    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| Error::Serialization {
            message: format!("cannot serialize metadata as JSON: {}", err),
        })
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a str, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a metadata mapping with string keys")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Document, E> {
        Ok(Document::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Document, A::Error> {
        let mut doc = Document::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            doc.set(key, value).map_err(de::Error::custom)?;
        }
        Ok(doc)
    }
}

/// Human-readable name of a value's kind, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
