//! Integration tests for the key codecs
//!
//! Tests pair-list keys, component escaping, and plain-separator keys.

use joinery_foundation::{KEY_SEPARATOR, decode_component, decode_key, encode_component, encode_key, join_key};
use proptest::prelude::*;

// =============================================================================
// Pair-List Keys
// =============================================================================

#[test]
fn pair_list_key_layout() {
    let key = encode_key([("id", Some("4711")), ("dept", Some("ITD#5.1"))]);
    assert_eq!(key, "id#4711#dept#ITD%r5.1#");
}

#[test]
fn null_values_are_left_out() {
    let key = encode_key([("id", Some("1")), ("name", None)]);
    assert_eq!(key, "id#1#");
    assert_eq!(decode_key(&key), vec![("id".to_string(), "1".to_string())]);
}

#[test]
fn decoding_tolerates_garbage() {
    assert!(decode_key("").is_empty());
    assert!(decode_key("lonely").is_empty());
    assert_eq!(decode_key("a#b#c").len(), 1);
    assert_eq!(decode_component("50%"), "50");
    assert_eq!(decode_component("%x"), "x");
}

// =============================================================================
// Plain-Separator Keys
// =============================================================================

#[test]
fn plain_keys_join_with_separator() {
    assert_eq!(join_key([Some("a"), None, Some("c")]), format!("a{KEY_SEPARATOR}{KEY_SEPARATOR}c"));
    assert_eq!(join_key([Some("only")]), "only");
}

proptest! {
    #[test]
    fn component_round_trip(s in ".*") {
        prop_assert_eq!(decode_component(&encode_component(&s)), s);
    }

    #[test]
    fn key_round_trip(pairs in proptest::collection::vec(("[a-z#%]{1,5}", ".*"), 0..4)) {
        let key = encode_key(pairs.iter().map(|(c, v)| (c.as_str(), Some(v.as_str()))));
        prop_assert_eq!(decode_key(&key), pairs);
    }
}
