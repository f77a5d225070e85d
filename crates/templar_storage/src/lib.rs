//! Record store, identifier resolution, and inheritance chains for Templar.
//!
//! This crate provides:
//! - [`NamespaceTable`] - Static mapping from type tags to namespaces
//! - [`resolve_identity`] - Canonical identifiers for raw records
//! - [`RecordStore`] - Indexed storage of every ingested record
//! - [`resolve_chain`] - Root-first `copy-from` ancestor chains
//! - [`LoaderConfig`] - Duplicate, unknown-type, and depth policies

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chain;
pub mod config;
pub mod identity;
pub mod namespace;
pub mod store;

pub use chain::{InheritanceChain, resolve_chain};
pub use config::{DuplicatePolicy, LoaderConfig, UnknownTypePolicy};
pub use identity::{Identity, resolve_identity};
pub use namespace::{IdRule, NamespaceConfig, NamespaceTable};
pub use store::{NamespaceRecords, RecordStore, StoredRecord};
