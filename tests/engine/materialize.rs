//! Integration tests for the materializer
//!
//! Tests defaults, type checks, arity, converters, obsolete fields, required
//! fields, and header stamping.

use std::sync::Arc;

use templar_engine::{Converters, Template, TemplateRegistry};
use templar_foundation::{ErrorKind, Result, Value};

use crate::fixtures::{Gadget, converters, store};

fn resolve_with(json: &str, id: &str, converters: &Converters) -> Result<Arc<Gadget>> {
    let store = store(json);
    TemplateRegistry::<Gadget>::new().resolve(&store, converters, id)
}

fn resolve(json: &str, id: &str) -> Result<Arc<Gadget>> {
    resolve_with(json, id, &converters())
}

// =============================================================================
// Defaults and Headers
// =============================================================================

#[test]
fn root_takes_defaults() {
    let gadget = resolve(r#"{"type": "TOOL", "id": "g", "name": "g"}"#, "g").unwrap();
    assert_eq!(gadget.charges, 0);
    assert!((gadget.weight - 1.0).abs() < f64::EPSILON);
    assert_eq!(gadget.coords, [0, 0]);
    assert_eq!(gadget.color, None);
    assert_eq!(gadget.extra, Value::Null);
}

#[test]
fn header_is_stamped() {
    let gadget = resolve(r#"{"type": "GENERIC", "id": "g", "name": "g"}"#, "g").unwrap();
    assert_eq!(gadget.id(), "g");
    assert_eq!(gadget.header().type_tag, "GENERIC");
    assert!(!gadget.header().is_abstract());
}

#[test]
fn source_key_differs_from_field_name() {
    let gadget = resolve(
        r#"{"type": "TOOL", "id": "g", "name": "g", "flags": ["x"]}"#,
        "g",
    )
    .unwrap();
    assert_eq!(gadget.tags, ["x"]);
}

// =============================================================================
// Type Checks
// =============================================================================

#[test]
fn float_field_accepts_int() {
    let gadget = resolve(r#"{"type": "TOOL", "id": "g", "name": "g", "weight": 3}"#, "g").unwrap();
    assert!((gadget.weight - 3.0).abs() < f64::EPSILON);
}

#[test]
fn int_field_accepts_integral_float() {
    let gadget = resolve(r#"{"type": "TOOL", "id": "g", "name": "g", "charges": 4.0}"#, "g").unwrap();
    assert_eq!(gadget.charges, 4);
}

#[test]
fn int_field_rejects_floats_beyond_i64() {
    let err = resolve(r#"{"type": "TOOL", "id": "g", "name": "g", "charges": 1e20}"#, "g")
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::FieldTypeMismatch { ref field, .. } if field == "charges"
    ));
}

#[test]
fn wrong_kind_is_rejected() {
    let err = resolve(r#"{"type": "TOOL", "id": "g", "name": 12}"#, "g").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::FieldTypeMismatch { ref field, .. } if field == "name"
    ));
}

#[test]
fn explicit_null_clears_optional_field() {
    let json = r#"[
        {"type": "TOOL", "abstract": "base", "name": "b", "color": "red"},
        {"type": "TOOL", "id": "g", "copy-from": "base", "color": null}
    ]"#;
    assert_eq!(resolve(json, "g").unwrap().color, None);
}

#[test]
fn any_field_keeps_raw_value() {
    let gadget = resolve(
        r#"{"type": "TOOL", "id": "g", "name": "g", "extra": {"nested": [1, 2]}}"#,
        "g",
    )
    .unwrap();
    assert_eq!(
        gadget.extra.get("nested"),
        Some(&Value::from(vec![1, 2]))
    );
}

#[test]
fn arity_is_enforced() {
    let err = resolve(r#"{"type": "TOOL", "id": "g", "name": "g", "coords": [1, 2, 3]}"#, "g")
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::ArityMismatch { expected: 2, actual: 3, .. }
    ));
}

#[test]
fn arity_applies_after_merging() {
    let err = resolve(
        r#"{"type": "TOOL", "id": "g", "name": "g", "extend": {"coords": [5]}}"#,
        "g",
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ArityMismatch { actual: 3, .. }));
}

// =============================================================================
// Converters
// =============================================================================

#[test]
fn kind_converter_parses_raw_node() {
    let gadget = resolve(r#"{"type": "TOOL", "id": "g", "name": "g", "power": "2kW"}"#, "g").unwrap();
    assert_eq!(gadget.power, 2000);
}

#[test]
fn converter_errors_propagate() {
    let err = resolve(r#"{"type": "TOOL", "id": "g", "name": "g", "power": "lots"}"#, "g")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidFieldValue { .. }));
}

#[test]
fn converted_value_is_inherited() {
    let json = r#"[
        {"type": "TOOL", "abstract": "base", "name": "b", "power": "60W"},
        {"type": "TOOL", "id": "g", "copy-from": "base"}
    ]"#;
    assert_eq!(resolve(json, "g").unwrap().power, 60);
}

#[test]
fn without_converter_custom_kind_takes_raw_value() {
    let err = resolve_with(
        r#"{"type": "TOOL", "id": "g", "name": "g", "power": "60W"}"#,
        "g",
        &Converters::new(),
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FieldTypeMismatch { .. }));
}

// =============================================================================
// Obsolete and Required Fields
// =============================================================================

#[test]
fn obsolete_field_is_still_populated() {
    let gadget = resolve(r#"{"type": "TOOL", "id": "g", "name": "g", "legacy": "old"}"#, "g").unwrap();
    assert_eq!(gadget.legacy, "old");
}

#[test]
fn required_field_missing_from_chain() {
    let err = resolve(r#"{"type": "TOOL", "id": "g", "charges": 1}"#, "g").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::MissingRequiredField { ref template_type, ref field }
            if template_type == "Gadget" && field == "name"
    ));
}

#[test]
fn required_field_may_come_from_ancestor() {
    let json = r#"[
        {"type": "TOOL", "abstract": "base", "name": "inherited"},
        {"type": "TOOL", "id": "g", "copy-from": "base"}
    ]"#;
    assert_eq!(resolve(json, "g").unwrap().name, "inherited");
}

#[test]
fn abstracts_may_be_incomplete() {
    let json = r#"[
        {"type": "TOOL", "abstract": "base", "charges": 5},
        {"type": "TOOL", "id": "g", "copy-from": "base", "name": "g"}
    ]"#;
    let store = store(json);
    let converters = converters();
    let mut registry = TemplateRegistry::<Gadget>::new();
    assert_eq!(registry.resolve_abstract(&store, &converters, "base").unwrap().charges, 5);
    assert_eq!(registry.resolve(&store, &converters, "g").unwrap().charges, 5);
}
