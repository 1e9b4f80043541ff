//! Structural paths into transmitted requests
//!
//! When the remote service rejects a request it may report *where* in that
//! request the failing node sits, as a path such as
//! `$.args[1].args.tables[0].name`. This module parses that syntax and
//! resolves it against the exact JSON structure that was sent.
//!
//! The resolver knows nothing about plugins. A path addresses positions in the
//! wire envelope (bulk wrapper indices included), so attributing the located
//! node to the plugin that contributed it is left to whoever reads the
//! pretty-printed dump.

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// Represents a segment in a path expression for navigating nested structures
///
/// Path expressions like "args[1].args" or "tables[0].table.name" are parsed
/// into a sequence of PathSegments for navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A named key for accessing object members
    Key(String),
    /// A numeric index for accessing array elements
    Index(usize),
}

/// Parse a path string into segments
///
/// Supports:
/// - An optional `$` root marker: `$.args[0]`
/// - Dot notation: `foo.bar.baz`
/// - Bracket notation: `foo["bar"]` or `foo['bar']`
/// - Array indices: `foo[0]` or `items[1].name`
/// - Escaped characters: `foo\.bar` (literal dot)
///
/// # Examples
///
/// ```
/// use metasync::path::{parse_path, PathSegment};
///
/// let segments = parse_path("$.args[1].args");
/// assert_eq!(segments[1], PathSegment::Index(1));
/// assert_eq!(segments.len(), 3);
/// ```
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    let path = path.trim();
    let path = path.strip_prefix('$').unwrap_or(path);
    if path.is_empty() || path == "/" {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }

        match ch {
            '\\' => {
                escaped = true;
            }
            '.' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current)));
                }

                match chars.peek().copied() {
                    Some(quote_char @ ('"' | '\'')) => {
                        chars.next();
                        let mut key = String::new();
                        let mut bracket_escaped = false;

                        while let Some(ch) = chars.next() {
                            if bracket_escaped {
                                key.push(ch);
                                bracket_escaped = false;
                            } else if ch == '\\' {
                                bracket_escaped = true;
                            } else if ch == quote_char {
                                if chars.peek() == Some(&']') {
                                    chars.next();
                                    break;
                                }
                                key.push(ch);
                            } else {
                                key.push(ch);
                            }
                        }

                        segments.push(PathSegment::Key(key));
                    }
                    _ => {
                        let mut bracket_content = String::new();
                        for next_ch in chars.by_ref() {
                            if next_ch == ']' {
                                break;
                            }
                            bracket_content.push(next_ch);
                        }

                        let trimmed = bracket_content.trim();
                        if let Ok(idx) = trimmed.parse::<usize>() {
                            segments.push(PathSegment::Index(idx));
                        } else if !trimmed.is_empty() {
                            segments.push(PathSegment::Key(trimmed.to_string()));
                        }
                    }
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(PathSegment::Key(current));
    }

    segments
}

/// Render segments back into dot/bracket notation.
pub fn format_segments(segments: &[PathSegment]) -> String {
    let mut out = String::from("$");
    for segment in segments {
        match segment {
            PathSegment::Key(key) if is_plain_key(key) => {
                out.push('.');
                out.push_str(key);
            }
            PathSegment::Key(key) => {
                out.push_str("[\"");
                out.push_str(&key.replace('\\', "\\\\").replace('"', "\\\""));
                out.push_str("\"]");
            }
            PathSegment::Index(idx) => {
                out.push('[');
                out.push_str(&idx.to_string());
                out.push(']');
            }
        }
    }
    out
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Resolve `path` against `value` without modifying it.
///
/// # Errors
///
/// Returns `Error::PathLookup` when a key is absent, an index is out of range,
/// or the path descends into a scalar.
pub fn lookup<'a>(value: &'a JsonValue, path: &str) -> Result<&'a JsonValue> {
    let segments = parse_path(path);
    lookup_segments(value, &segments).map_err(|message| Error::PathLookup {
        path: path.to_string(),
        message,
    })
}

fn lookup_segments<'a>(
    value: &'a JsonValue,
    segments: &[PathSegment],
) -> std::result::Result<&'a JsonValue, String> {
    let mut current = value;
    for (depth, segment) in segments.iter().enumerate() {
        let at = format_segments(&segments[..depth]);
        current = match (segment, current) {
            (PathSegment::Key(key), JsonValue::Object(map)) => map
                .get(key)
                .ok_or_else(|| format!("key '{}' not found at {}", key, at))?,
            (PathSegment::Index(idx), JsonValue::Array(items)) => items.get(*idx).ok_or_else(|| {
                format!(
                    "index {} out of range at {} (length {})",
                    idx,
                    at,
                    items.len()
                )
            })?,
            // Numeric keys on objects, e.g. `foo.0` against {"0": ...}
            (PathSegment::Index(idx), JsonValue::Object(map)) => map
                .get(&idx.to_string())
                .ok_or_else(|| format!("key '{}' not found at {}", idx, at))?,
            (PathSegment::Key(key), other) => {
                return Err(format!(
                    "expected object while looking up '{}' at {}, found {}",
                    key,
                    at,
                    json_kind(other)
                ))
            }
            (PathSegment::Index(idx), other) => {
                return Err(format!(
                    "expected array while looking up index {} at {}, found {}",
                    idx,
                    at,
                    json_kind(other)
                ))
            }
        };
    }
    Ok(current)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
