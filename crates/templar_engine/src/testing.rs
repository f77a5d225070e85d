//! Shared fixtures for unit tests.

use std::sync::OnceLock;

use templar_foundation::{FieldKind, Record};
use templar_storage::{LoaderConfig, NamespaceConfig, NamespaceTable, RecordStore};

use crate::field;
use crate::schema::{Schema, Template, TemplateHeader};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tool {
    pub header: TemplateHeader,
    pub name: String,
    pub max_charges: i64,
    pub volume: f64,
    pub flags: Vec<String>,
    pub material: Option<String>,
    pub symbol: String,
}

impl Template for Tool {
    const NAMESPACE: &'static str = "item";
    const TYPE_NAME: &'static str = "Tool";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Tool>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder(Self::TYPE_NAME)
                .field(field!(Tool, name, FieldKind::String).required())
                .field(field!(Tool, max_charges, FieldKind::Int))
                .field(field!(Tool, volume, FieldKind::Float).with_default(1.0))
                .field(field!(Tool, flags, FieldKind::list(FieldKind::String)))
                .field(field!(Tool, material, FieldKind::String).with_default(templar_foundation::Value::Null))
                .field(field!(Tool, symbol, FieldKind::String).with_default("/").obsolete())
                .build()
        })
    }

    fn header(&self) -> &TemplateHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut TemplateHeader {
        &mut self.header
    }
}

pub fn table() -> NamespaceTable {
    NamespaceTable::new()
        .with_namespace(NamespaceConfig::new("item").with_type_tags(["TOOL", "GENERIC"]))
        .unwrap()
}

pub fn store(json: &str) -> RecordStore {
    let mut store = RecordStore::with_config(table(), LoaderConfig::default());
    store.ingest_json(json, Some("test.json")).unwrap();
    store
}

pub fn tool(id: &str) -> Record {
    Record::new()
        .with("type", "TOOL")
        .with("id", id)
        .with("name", id)
}
