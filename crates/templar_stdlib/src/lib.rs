//! Standard converters, namespaces, and reference schemas for Templar.
//!
//! This crate provides:
//! - [`standard_namespaces`] - The item, recipe, and construction table
//! - [`standard_converters`] - `range` converter and `requirements` loader
//! - [`ItemTemplate`], [`RecipeTemplate`], [`ConstructionTemplate`] -
//!   Reference schemas exercising the engine
//! - [`standard_templates`] - A ready [`Templates`](templar_engine::Templates) facade

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod converters;
pub mod namespaces;
pub mod schemas;
pub mod types;

pub use converters::{NO_RECOVER, RANGE, REQUIREMENTS, standard_converters};
pub use namespaces::{CONSTRUCTION, ITEM, RECIPE, standard_namespaces};
pub use schemas::{ConstructionTemplate, ItemTemplate, RecipeTemplate, standard_templates};
pub use types::{Component, IntRange, Quality};
