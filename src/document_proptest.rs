//! Property-based tests for the ordered metadata document.

#[cfg(test)]
mod proptest_tests {
    use crate::document::{Document, Value};
    use crate::error::Error;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
            Just(Value::Null),
        ]
    }

    fn value() -> impl Strategy<Value = Value> {
        scalar().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
                prop::collection::vec(("[a-z_]{1,6}", inner), 0..4).prop_map(|pairs| {
                    let mut mapping = serde_yaml::Mapping::new();
                    for (key, value) in pairs {
                        mapping.insert(Value::from(key), value);
                    }
                    Value::Mapping(mapping)
                }),
            ]
        })
    }

    /// Unique keys in generation order, paired with values.
    fn entries() -> impl Strategy<Value = Vec<(String, Value)>> {
        prop::collection::vec(("[a-z][a-z0-9_]{0,8}", value()), 0..8).prop_map(|pairs| {
            let mut seen = HashSet::new();
            pairs
                .into_iter()
                .filter(|(key, _)| seen.insert(key.clone()))
                .collect()
        })
    }

    fn build(entries: &[(String, Value)]) -> Document {
        let mut doc = Document::new();
        for (key, value) in entries {
            doc.set(key.clone(), value.clone()).unwrap();
        }
        doc
    }

    proptest! {
        /// Property: keys come back exactly in insertion order
        #[test]
        fn keys_follow_insertion_order(entries in entries()) {
            let doc = build(&entries);
            let keys: Vec<&str> = doc.keys().collect();
            let expected: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
            prop_assert_eq!(keys, expected);
        }

        /// Property: YAML round trip preserves order, nesting and scalar typing
        #[test]
        fn yaml_round_trip_is_lossless(entries in entries()) {
            let doc = build(&entries);
            let yaml = doc.to_yaml_string().unwrap();
            let parsed = Document::from_yaml_str(&yaml).unwrap();
            prop_assert_eq!(parsed, doc, "yaml was:\n{}", yaml);
        }

        /// Property: wire JSON round trip preserves order, nesting and scalar typing
        #[test]
        fn json_round_trip_is_lossless(entries in entries()) {
            let doc = build(&entries);
            let bytes = doc.to_json_vec().unwrap();
            let parsed = Document::from_json_slice(&bytes).unwrap();
            prop_assert_eq!(parsed, doc);
        }

        /// Property: setting an existing key fails and leaves the document unchanged
        #[test]
        fn duplicate_set_is_rejected(entries in entries(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!entries.is_empty());
            let mut doc = build(&entries);
            let before = doc.clone();
            let (key, _) = &entries[pick.index(entries.len())];

            let result = doc.set(key.clone(), Value::from("replacement"));
            let is_duplicate_key =
                matches!(result, Err(Error::DuplicateKey { key: ref k }) if k == key);
            prop_assert!(is_duplicate_key);
            prop_assert_eq!(doc, before);
        }
    }
}
