//! Core values, records, field kinds, and errors for Templar.
//!
//! This crate provides:
//! - [`Value`] - The tagged value type carried by records and runtime data
//! - [`Record`] - One raw, ordered key/value definition as parsed from JSON
//! - [`FieldKind`] - Field type descriptors used by schemas
//! - [`Error`] - Rich error types with context
//! - [`FromValue`] / [`IntoValue`] - Conversions between values and Rust types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod convert;
pub mod error;
pub mod kind;
pub mod record;
pub mod value;

pub use convert::{FromValue, IntoValue};
pub use error::{Error, ErrorContext, ErrorKind};
pub use kind::FieldKind;
pub use record::Record;
pub use value::{List, Map, Value};

/// Result type alias for Templar operations.
pub type Result<T> = std::result::Result<T, Error>;
