//! Integration tests for record-level merging
//!
//! Tests the five merge modifiers as written in records, both wrapped on a
//! field and collected in record-level containers.

use std::sync::Arc;

use templar_engine::TemplateRegistry;
use templar_foundation::{ErrorKind, Result};

use crate::fixtures::{Gadget, converters, store};

fn resolve(json: &str, id: &str) -> Result<Arc<Gadget>> {
    let store = store(json);
    TemplateRegistry::<Gadget>::new().resolve(&store, &converters(), id)
}

fn with_base(child: &str) -> String {
    format!(
        r#"[
            {{"type": "TOOL", "abstract": "base", "name": "base", "charges": 10,
              "weight": 2.0, "flags": ["a", "b", "c"]}},
            {{"type": "TOOL", "id": "child", "copy-from": "base", {child}}}
        ]"#
    )
}

// =============================================================================
// Absolute
// =============================================================================

#[test]
fn absolute_override() {
    let child = resolve(&with_base(r#""charges": 3"#), "child").unwrap();
    assert_eq!(child.charges, 3);
}

#[test]
fn absolute_wrapper_is_explicit_override() {
    let child = resolve(&with_base(r#""flags": {"absolute": ["z"]}"#), "child").unwrap();
    assert_eq!(child.tags, ["z"]);
}

#[test]
fn absent_field_inherits() {
    let child = resolve(&with_base(r#""name": "child""#), "child").unwrap();
    assert_eq!(child.charges, 10);
    assert_eq!(child.tags, ["a", "b", "c"]);
}

// =============================================================================
// Relative
// =============================================================================

#[test]
fn relative_adds_to_parent() {
    let child = resolve(&with_base(r#""charges": {"relative": 5}"#), "child").unwrap();
    assert_eq!(child.charges, 15);
}

#[test]
fn relative_at_root_is_the_delta() {
    let root = resolve(
        r#"{"type": "TOOL", "id": "root", "name": "root", "charges": {"relative": 5}}"#,
        "root",
    )
    .unwrap();
    assert_eq!(root.charges, 5);
}

#[test]
fn relative_container() {
    let child = resolve(
        &with_base(r#""relative": {"charges": -4, "weight": 0.5}"#),
        "child",
    )
    .unwrap();
    assert_eq!(child.charges, 6);
    assert!((child.weight - 2.5).abs() < f64::EPSILON);
}

#[test]
fn relative_on_string_is_rejected() {
    let err = resolve(&with_base(r#""name": {"relative": 1}"#), "child").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ModifierTypeMismatch { .. }));
}

// =============================================================================
// Proportional
// =============================================================================

#[test]
fn proportional_multiplies() {
    let json = r#"[
        {"type": "TOOL", "abstract": "base", "name": "base", "charges": 100},
        {"type": "TOOL", "id": "child", "copy-from": "base", "charges": {"proportional": 1.5}}
    ]"#;
    assert_eq!(resolve(json, "child").unwrap().charges, 150);
}

#[test]
fn proportional_truncates_integers() {
    let child = resolve(&with_base(r#""charges": {"proportional": 0.33}"#), "child").unwrap();
    assert_eq!(child.charges, 3);
}

#[test]
fn proportional_container_on_float() {
    let child = resolve(&with_base(r#""proportional": {"weight": 1.25}"#), "child").unwrap();
    assert!((child.weight - 2.5).abs() < f64::EPSILON);
}

#[test]
fn proportional_on_list_is_rejected() {
    let err = resolve(&with_base(r#""proportional": {"flags": 2}"#), "child").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ModifierTypeMismatch { .. }));
}

// =============================================================================
// Extend and Delete
// =============================================================================

#[test]
fn extend_appends() {
    let json = r#"[
        {"type": "TOOL", "abstract": "base", "name": "base", "flags": ["a", "b"]},
        {"type": "TOOL", "id": "child", "copy-from": "base", "extend": {"flags": ["c"]}}
    ]"#;
    assert_eq!(resolve(json, "child").unwrap().tags, ["a", "b", "c"]);
}

#[test]
fn delete_removes_matches() {
    let child = resolve(&with_base(r#""delete": {"flags": ["b"]}"#), "child").unwrap();
    assert_eq!(child.tags, ["a", "c"]);
}

#[test]
fn field_and_container_modifiers_stack() {
    let child = resolve(
        &with_base(r#""flags": {"extend": ["d"]}, "delete": {"flags": ["a"]}"#),
        "child",
    )
    .unwrap();
    assert_eq!(child.tags, ["b", "c", "d"]);
}

#[test]
fn extend_scalar_is_a_single_item() {
    let child = resolve(&with_base(r#""extend": {"flags": "z"}"#), "child").unwrap();
    assert_eq!(child.tags, ["a", "b", "c", "z"]);
}

#[test]
fn extend_on_number_is_rejected() {
    let err = resolve(&with_base(r#""extend": {"charges": [1]}"#), "child").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ModifierTypeMismatch { .. }));
}

#[test]
fn extended_items_are_type_checked() {
    let err = resolve(&with_base(r#""extend": {"flags": [7]}"#), "child").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FieldTypeMismatch { .. }));
}

// =============================================================================
// Multi-Level Chains
// =============================================================================

#[test]
fn modifiers_compose_down_the_chain() {
    let json = r#"[
        {"type": "TOOL", "abstract": "a", "name": "a", "charges": 10},
        {"type": "TOOL", "abstract": "b", "copy-from": "a", "charges": {"relative": 10}},
        {"type": "TOOL", "id": "c", "copy-from": "b", "proportional": {"charges": 2.5}}
    ]"#;
    assert_eq!(resolve(json, "c").unwrap().charges, 50);
}
