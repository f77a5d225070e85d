//! Integration tests for identifier resolution
//!
//! Tests explicit ids, abstract ids, and the namespace fallback rules.

use templar_foundation::{ErrorKind, Record};
use templar_storage::{IdRule, Identity, NamespaceConfig, resolve_identity};

fn explicit() -> NamespaceConfig {
    NamespaceConfig::new("item")
}

fn recipes() -> NamespaceConfig {
    NamespaceConfig::new("recipe").with_id_rule(IdRule::ResultWithSuffix)
}

fn constructions() -> NamespaceConfig {
    NamespaceConfig::new("construction").with_id_rule(IdRule::CategoryDescription)
}

// =============================================================================
// Explicit Identifiers
// =============================================================================

#[test]
fn explicit_id_is_verbatim() {
    let record = Record::new().with("id", "Wrench-XL");
    assert_eq!(
        resolve_identity(&record, &explicit()).unwrap(),
        Identity::concrete("Wrench-XL")
    );
}

#[test]
fn abstract_id() {
    let record = Record::new().with("abstract", "tool_base");
    let identity = resolve_identity(&record, &explicit()).unwrap();
    assert!(identity.is_abstract);
    assert_eq!(identity.to_string(), "abstract 'tool_base'");
}

#[test]
fn explicit_id_beats_fallback() {
    let record = Record::new().with("id", "plank_alt").with("result", "plank");
    assert_eq!(resolve_identity(&record, &recipes()).unwrap().id, "plank_alt");
}

#[test]
fn non_string_id_is_malformed() {
    let record = Record::new().with("id", 42);
    let err = resolve_identity(&record, &explicit()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedRecord { .. }));
}

#[test]
fn both_id_and_abstract_is_malformed() {
    let record = Record::new().with("id", "a").with("abstract", "b");
    assert!(resolve_identity(&record, &explicit()).is_err());
}

#[test]
fn explicit_rule_has_no_fallback() {
    let record = Record::new().with("result", "plank");
    let err = resolve_identity(&record, &explicit()).unwrap_err();
    assert!(err.to_string().contains("'id'"));
}

// =============================================================================
// Recipe Fallback
// =============================================================================

#[test]
fn recipe_uses_result() {
    let record = Record::new().with("result", "plank");
    assert_eq!(resolve_identity(&record, &recipes()).unwrap().id, "plank");
}

#[test]
fn recipe_appends_suffix() {
    let record = Record::new()
        .with("result", "plank")
        .with("id_suffix", "from_log");
    assert_eq!(
        resolve_identity(&record, &recipes()).unwrap().id,
        "plank_from_log"
    );
}

#[test]
fn empty_suffix_is_ignored() {
    let record = Record::new().with("result", "plank").with("id_suffix", "");
    assert_eq!(resolve_identity(&record, &recipes()).unwrap().id, "plank");
}

#[test]
fn recipe_without_result_is_malformed() {
    let err = resolve_identity(&Record::new(), &recipes()).unwrap_err();
    assert!(err.to_string().contains("'result'"));
}

// =============================================================================
// Construction Fallback
// =============================================================================

#[test]
fn construction_normalizes() {
    let record = Record::new()
        .with("category", "FURN")
        .with("description", "  Build a Wooden-Bench!! ");
    assert_eq!(
        resolve_identity(&record, &constructions()).unwrap().id,
        "furn_build_a_wooden_bench"
    );
}

#[test]
fn construction_needs_description() {
    let record = Record::new().with("category", "FURN");
    let err = resolve_identity(&record, &constructions()).unwrap_err();
    assert!(err.to_string().contains("'description'"));
}

#[test]
fn construction_rejects_non_string_category() {
    let record = Record::new()
        .with("category", 3)
        .with("description", "dig");
    assert!(matches!(
        resolve_identity(&record, &constructions()).unwrap_err().kind,
        ErrorKind::MalformedRecord { .. }
    ));
}
