//! Templar - Data-driven templates with copy-from inheritance
//!
//! This crate re-exports all layers of the Templar system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: templar_runtime    - Entity handles, serials, save files
//!          templar_stdlib     - Standard namespaces, converters, schemas
//! Layer 2: templar_engine     - Merge engine, materializer, registries
//! Layer 1: templar_storage    - Record store, identities, inheritance chains
//! Layer 0: templar_foundation - Core types (Value, Record, FieldKind, Error)
//! ```

pub use templar_engine as engine;
pub use templar_foundation as foundation;
pub use templar_runtime as runtime;
pub use templar_stdlib as stdlib;
pub use templar_storage as storage;
