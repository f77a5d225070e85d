//! Integration tests for Value types
//!
//! Tests construction, accessors, JSON conversion, and typed conversions.

use std::collections::BTreeMap;

use templar_foundation::{FromValue, IntoValue, List, Value};

// =============================================================================
// Value Construction
// =============================================================================

#[test]
fn value_null() {
    let v = Value::Null;
    assert!(v.is_null());
    assert_eq!(v.kind_name(), "null");
    assert_eq!(Value::default(), Value::Null);
}

#[test]
fn value_int() {
    let v = Value::Int(42);
    assert!(v.is_numeric());
    assert_eq!(v.as_int(), Some(42));
    assert_eq!(v.as_float(), None);
    assert_eq!(v.as_number(), Some(42.0));
}

#[test]
fn value_float() {
    let v = Value::Float(1.5);
    assert_eq!(v.as_float(), Some(1.5));
    assert_eq!(v.as_int(), None);
}

#[test]
fn value_string() {
    let v = Value::from("wrench");
    assert_eq!(v.as_str(), Some("wrench"));
    assert_eq!(v.kind_name(), "string");
}

#[test]
fn value_list_from_vec() {
    let v: Value = vec!["a", "b"].into();
    let items = v.as_list().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1], Value::from("b"));
}

#[test]
fn value_map_lookup() {
    let v = Value::map_from([("id", "CUT")]);
    assert_eq!(v.get("id"), Some(&Value::from("CUT")));
    assert_eq!(v.get("level"), None);
    assert_eq!(Value::Int(1).get("id"), None);
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn int_and_float_are_distinct() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn list_equality_is_structural() {
    let a: Value = vec![1, 2, 3].into();
    let b: Value = (1..=3).map(Value::Int).collect::<List>().into();
    assert_eq!(a, b);
}

// =============================================================================
// JSON
// =============================================================================

#[test]
fn json_round_trip() {
    let json = serde_json::json!({
        "id": "knife",
        "weight": 340,
        "volume": 0.25,
        "flags": ["SHEATH_KNIFE"],
        "qualities": [{"id": "CUT", "level": 1}],
        "symbol": null
    });
    assert_eq!(Value::from_json(&json).to_json(), json);
}

#[test]
fn json_numbers_keep_their_kind() {
    assert_eq!(Value::from_json(&serde_json::json!(3)), Value::Int(3));
    assert_eq!(Value::from_json(&serde_json::json!(3.0)), Value::Float(3.0));
}

#[test]
fn display_is_json_like() {
    let v = Value::map_from([("id", Value::from("CUT")), ("level", Value::Int(2))]);
    assert_eq!(v.to_string(), r#"{"id": "CUT", "level": 2}"#);
}

// =============================================================================
// Typed Conversions
// =============================================================================

#[test]
fn option_reads_null_as_none() {
    assert_eq!(Option::<String>::from_value(&Value::Null), Some(None));
    assert_eq!(
        Option::<String>::from_value(&Value::from("steel")),
        Some(Some("steel".to_string()))
    );
    assert_eq!(None::<String>.into_value(), Value::Null);
}

#[test]
fn vec_reads_null_as_empty() {
    assert_eq!(Vec::<i64>::from_value(&Value::Null), Some(Vec::new()));
    assert_eq!(Vec::<i64>::from_value(&vec![1, 2].into()), Some(vec![1, 2]));
    assert_eq!(Vec::<i64>::from_value(&vec!["x"].into()), None);
}

#[test]
fn btree_map_conversion() {
    let mut map = BTreeMap::new();
    map.insert("CUT".to_string(), 2i64);
    let value = map.clone().into_value();
    assert_eq!(value.get("CUT"), Some(&Value::Int(2)));
    assert_eq!(BTreeMap::<String, i64>::from_value(&value), Some(map));
}

#[test]
fn mismatched_scalar_conversion_fails() {
    assert_eq!(i64::from_value(&Value::from("10")), None);
    assert_eq!(bool::from_value(&Value::Int(1)), None);
}
