//! Integration tests for the runtime layer
//!
//! Tests entity instances and save files over the standard schemas.


use templar_engine::Templates;
use templar_stdlib::{standard_namespaces, standard_templates};
use templar_storage::RecordStore;

pub const ITEMS: &str = r#"[
    {"type": "TOOL", "abstract": "tool_base", "name": "tool", "max_charges": 100,
     "qualities": [{"id": "HAMMER", "level": 1}]},
    {"type": "TOOL", "id": "wrench", "copy-from": "tool_base", "name": "wrench",
     "max_charges": {"relative": -20}},
    {"type": "GENERIC", "id": "rag", "name": "rag", "material": ["cotton"]}
]"#;

pub fn templates() -> Templates {
    let mut store = RecordStore::new(standard_namespaces());
    store.ingest_json(ITEMS, Some("items.json")).unwrap();
    standard_templates(store).unwrap()
}
