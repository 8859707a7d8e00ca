//! Property tests for queries, substitution and comparison.

use apitest::dictionary::Dictionary;
use apitest::query::{query, query_one};
use apitest::validation::compare;
use proptest::prelude::*;
use serde_json::{json, Value};

proptest! {
    #[test]
    fn test_concrete_path_yields_one_value(key in "[a-z]{1,8}", value in "[a-zA-Z0-9 ]{0,16}") {
        let document = json!({"outer": {(key.clone()): value.clone()}});
        let path = format!("outer.{}", key);

        prop_assert_eq!(query(&document, &path).unwrap(), vec![value.clone()]);
        prop_assert_eq!(query_one(&document, &path).unwrap(), value);
    }

    #[test]
    fn test_wildcard_concatenates_elements(ids in prop::collection::vec(any::<i32>(), 1..20)) {
        let items: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
        let document = json!({"items": items});

        let expected: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        prop_assert_eq!(query(&document, "items.*.id").unwrap(), expected);
    }

    #[test]
    fn test_index_beyond_length_is_error(len in 0usize..10, extra in 0usize..5) {
        let document = json!({"items": vec![0; len]});
        let path = format!("items.{}", len + extra);

        prop_assert!(query(&document, &path).is_err());
    }

    #[test]
    fn test_marker_free_text_unchanged(text in "[a-zA-Z0-9 ,.:/\"\\[\\]-]{0,64}") {
        let dictionary = Dictionary::with_entries([("HOST", "example.com")]);
        prop_assert_eq!(dictionary.apply(&text).unwrap(), text);
    }

    #[test]
    fn test_set_then_substitute(key in "[A-Z][A-Z_]{0,10}", value in "[a-zA-Z0-9 ./:-]{0,32}") {
        let mut dictionary = Dictionary::new();
        dictionary.set(key.clone(), value.clone());

        prop_assert_eq!(dictionary.get(&key), Some(value.as_str()));
        prop_assert_eq!(dictionary.apply(&format!("<{{{{{}}}}}>", key)).unwrap(), format!("<{}>", value));
    }

    #[test]
    fn test_sequence_increments_once_per_apply(count in 1usize..20) {
        let dictionary = Dictionary::with_entries([("N", "$seq")]);

        for expected in 0..count {
            prop_assert_eq!(dictionary.apply("id={{N}}").unwrap(), format!("id={}", expected));
        }
    }

    #[test]
    fn test_integer_comparison_matches_numeric_order(a in any::<i64>(), b in any::<i64>()) {
        let result = compare(&a.to_string(), &b.to_string());
        prop_assert_eq!(result.ordering(), a.cmp(&b));
    }
}
