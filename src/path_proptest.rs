//! Property-based tests for error path parsing and lookup.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{format_segments, lookup, parse_path, PathSegment};
    use proptest::prelude::*;
    use serde_json::{json, Value as JsonValue};

    fn segment() -> impl Strategy<Value = PathSegment> {
        prop_oneof![
            "[a-zA-Z_][a-zA-Z0-9_]{0,8}".prop_map(PathSegment::Key),
            "[a-z .\"'\\]\\[\\\\-]{0,8}".prop_map(PathSegment::Key),
            (0usize..6).prop_map(PathSegment::Index),
        ]
    }

    /// Nest `leaf` so that `segments` addresses it.
    fn nest(segments: &[PathSegment], leaf: JsonValue) -> JsonValue {
        segments.iter().rev().fold(leaf, |inner, segment| match segment {
            PathSegment::Key(key) => {
                let mut map = serde_json::Map::new();
                map.insert(key.clone(), inner);
                JsonValue::Object(map)
            }
            PathSegment::Index(idx) => {
                let mut items = vec![JsonValue::Null; *idx + 1];
                items[*idx] = inner;
                JsonValue::Array(items)
            }
        })
    }

    // ============================================================================
    // parse_path / format_segments property tests
    // ============================================================================

    proptest! {
        /// Property: formatting then parsing reproduces the segments
        #[test]
        fn format_then_parse_round_trips(segments in prop::collection::vec(segment(), 0..6)) {
            let rendered = format_segments(&segments);
            prop_assert_eq!(parse_path(&rendered), segments, "rendered as {}", rendered);
        }

        /// Property: the `$` root marker never changes the parsed segments
        #[test]
        fn root_marker_is_optional(path in "[a-z]{1,5}(\\.[a-z]{1,5}|\\[[0-9]\\]){0,4}") {
            let with_root = format!("$.{}", path);
            prop_assert_eq!(parse_path(&with_root), parse_path(&path));
        }

        /// Property: parse_path never panics on arbitrary input
        #[test]
        fn parse_path_never_panics(path in ".*") {
            let _ = parse_path(&path);
        }
    }

    // ============================================================================
    // lookup property tests
    // ============================================================================

    proptest! {
        /// Property: a path built from segments finds the node nested at them
        #[test]
        fn lookup_finds_nested_node(
            segments in prop::collection::vec(segment(), 0..6),
            leaf in any::<i64>(),
        ) {
            let value = nest(&segments, json!(leaf));
            let found = lookup(&value, &format_segments(&segments));
            prop_assert!(found.is_ok(), "lookup failed: {:?}", found.err());
            prop_assert_eq!(found.unwrap(), &json!(leaf));
        }

        /// Property: lookup either resolves or reports a PathLookup error, never panics
        #[test]
        fn lookup_never_panics(path in ".*") {
            let value = json!({"type": "bulk", "args": [{"type": "clear_metadata", "args": {}}]});
            if let Err(err) = lookup(&value, &path) {
                let is_path_lookup = matches!(err, crate::error::Error::PathLookup { .. });
                prop_assert!(is_path_lookup);
            }
        }

        /// Property: an index past the end of an array is always an error
        #[test]
        fn lookup_out_of_range_index_fails(len in 0usize..5, extra in 0usize..5) {
            let value = JsonValue::Array(vec![JsonValue::Null; len]);
            let path = format!("$[{}]", len + extra);
            prop_assert!(lookup(&value, &path).is_err());
        }
    }
}
