//! Integration tests for the multi-namespace facade
//!
//! Tests registration, typed and dynamic lookups, and whole-game loading.

use std::sync::Arc;

use templar_engine::{LoadState, Templates};
use templar_foundation::ErrorKind;

use crate::fixtures::{Blueprint, Gadget, converters, store};

const GAME: &str = r#"[
    {"type": "TOOL", "abstract": "tool_base", "name": "tool", "charges": 100},
    {"type": "TOOL", "id": "wrench", "copy-from": "tool_base", "charges": {"relative": -20}},
    {"type": "RECIPE", "result": "wrench", "time": 300},
    {"type": "RECIPE", "result": "wrench", "id_suffix": "quick", "copy-from": "wrench",
     "time": {"proportional": 0.5}}
]"#;

fn templates() -> Templates {
    Templates::new(store(GAME), converters())
        .with_template::<Gadget>()
        .unwrap()
        .with_template::<Blueprint>()
        .unwrap()
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn namespaces_are_listed() {
    let templates = templates();
    let mut namespaces: Vec<_> = templates.namespaces().collect();
    namespaces.sort_unstable();
    assert_eq!(namespaces, ["item", "recipe"]);
}

#[test]
fn namespace_binds_one_type() {
    let err = Templates::new(store(GAME), converters())
        .with_template::<Gadget>()
        .unwrap()
        .with_template::<Gadget>()
        .err()
        .unwrap();
    assert!(matches!(err.kind, ErrorKind::Internal(_)));
}

#[test]
fn unregistered_type_is_an_error() {
    let mut templates = Templates::new(store(GAME), converters())
        .with_template::<Gadget>()
        .unwrap();
    assert!(templates.resolve::<Blueprint>("wrench").is_err());
    assert!(templates.registry::<Blueprint>().is_none());
}

// =============================================================================
// Lookups
// =============================================================================

#[test]
fn same_id_in_two_namespaces() {
    let mut templates = templates();
    let item = templates.resolve::<Gadget>("wrench").unwrap();
    let recipe = templates.resolve::<Blueprint>("wrench").unwrap();
    assert_eq!(item.charges, 80);
    assert_eq!(recipe.time, 300);
}

#[test]
fn recipe_fallback_ids_inherit() {
    let mut templates = templates();
    let quick = templates.resolve::<Blueprint>("wrench_quick").unwrap();
    assert_eq!(quick.time, 150);
    assert_eq!(quick.result, "wrench");
}

#[test]
fn dynamic_lookup_downcasts() {
    let mut templates = templates();
    let any = templates.resolve_dyn("item", "wrench").unwrap();
    let wrench = any.downcast::<Gadget>().unwrap();
    assert_eq!(wrench.charges, 80);
    assert!(Arc::ptr_eq(&wrench, &templates.get::<Gadget>("wrench").unwrap()));
}

#[test]
fn dynamic_lookup_of_unknown_namespace() {
    let mut templates = templates();
    let err = templates.resolve_dyn("monster", "zombie").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownNamespace(_)));
}

#[test]
fn abstract_lookup() {
    let mut templates = templates();
    assert!(templates.resolve::<Gadget>("tool_base").is_err());
    assert_eq!(templates.resolve_abstract::<Gadget>("tool_base").unwrap().charges, 100);
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn per_namespace_loading() {
    let mut templates = templates();
    assert_eq!(templates.state("item"), Some(LoadState::Unloaded));
    assert_eq!(templates.load_abstracts("item").unwrap(), 1);
    assert_eq!(templates.state("item"), Some(LoadState::AbstractsLoaded));
    assert_eq!(templates.load_concrete("recipe").unwrap(), 2);
    assert_eq!(templates.state("recipe"), Some(LoadState::ConcreteLoaded));
    assert_eq!(templates.state("monster"), None);
}

#[test]
fn load_all() {
    let mut templates = templates();
    assert_eq!(templates.load_all().unwrap(), 3);
    assert!(templates.get::<Blueprint>("wrench_quick").is_some());
    assert_eq!(templates.registry::<Gadget>().unwrap().len(), 1);
}
