//! Merge engine, materializer, and template registries for Templar.
//!
//! This crate provides:
//! - [`Modifier`] - Decoded merge modifiers (absolute, relative, ...)
//! - [`merge`] - The field merge engine
//! - [`Schema`] - Static field-descriptor tables per template type
//! - [`Materializer`] - Builds typed templates from records
//! - [`TemplateRegistry`] - Per-namespace memoized resolution
//! - [`Templates`] - Multi-namespace facade over one record store

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod convert;
pub mod materialize;
pub mod merge;
pub mod modifier;
pub mod registry;
pub mod schema;
pub mod templates;

#[cfg(test)]
mod testing;

/// Re-exported for the [`field!`] macro.
pub use templar_foundation as foundation;

pub use convert::{ConvertFn, Converters, FieldInput, FieldLoaderFn};
pub use materialize::{Materializer, Resolved};
pub use merge::{merge, merge_all};
pub use modifier::{Modifier, ModifierOp, RecordModifiers};
pub use registry::{LoadState, TemplateRegistry};
pub use schema::{FieldDescriptor, Schema, SchemaBuilder, Template, TemplateHeader};
pub use templates::{AnyTemplate, Templates};
