//! Entity handles, runtime data, and save files for Templar.
//!
//! This crate provides:
//! - [`SerialCounter`] - Explicit, atomic serial source
//! - [`RuntimeData`] - Per-entity mutable state bag
//! - [`Instance`] - Shared template plus runtime data plus serial
//! - [`SaveFile`] - `MessagePack` save files of [`SavedInstance`]s

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod data;
pub mod instance;
pub mod save;
pub mod serial;

pub use data::RuntimeData;
pub use instance::{Instance, SavedInstance};
pub use save::SaveFile;
pub use serial::SerialCounter;
