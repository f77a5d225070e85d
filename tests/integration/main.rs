//! Cross-layer integration tests for Templar
//!
//! Tests that load game data through every layer, from raw JSON to saved
//! entities.

mod items;
mod persistence;

use templar::engine::Templates;
use templar::stdlib::{standard_namespaces, standard_templates};
use templar::storage::{LoaderConfig, RecordStore};

/// Loads every `(source, json)` file into one store and wraps it in the
/// standard facade.
pub fn game(files: &[(&str, &str)]) -> Templates {
    game_with(LoaderConfig::default(), files)
}

pub fn game_with(config: LoaderConfig, files: &[(&str, &str)]) -> Templates {
    let mut store = RecordStore::with_config(standard_namespaces(), config);
    for (source, json) in files {
        store.ingest_json(json, Some(source)).unwrap();
    }
    standard_templates(store).unwrap()
}
