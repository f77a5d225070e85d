//! Custom converters and field loaders.
//!
//! A converter turns one raw node into a field value. A field loader takes
//! over a field entirely: it sees the record, the inherited value, and the
//! record-level containers, and is responsible for applying them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use templar_foundation::{FieldKind, Record, Result, Value};

use crate::modifier::RecordModifiers;

/// Converts a raw node for the named field.
pub type ConvertFn = Arc<dyn Fn(&str, &Value) -> Result<Value> + Send + Sync>;

/// Loads a whole field from its [`FieldInput`].
pub type FieldLoaderFn = Arc<dyn Fn(&FieldInput<'_>) -> Result<Value> + Send + Sync>;

/// Everything a field loader may consult.
#[derive(Clone, Copy, Debug)]
pub struct FieldInput<'a> {
    /// The record being materialized.
    pub record: &'a Record,
    /// The field's source key.
    pub field: &'a str,
    /// The field's declared kind.
    pub kind: &'a FieldKind,
    /// The raw node under `field`.
    pub raw: &'a Value,
    /// The value inherited from the parent template, `None` at the root.
    pub parent: Option<&'a Value>,
    /// The field's schema default.
    pub default: &'a Value,
    /// Record-level containers of the record.
    pub modifiers: &'a RecordModifiers,
}

impl FieldInput<'_> {
    /// Returns the inherited value, or the default at the root.
    #[must_use]
    pub fn inherited(&self) -> &Value {
        self.parent.unwrap_or(self.default)
    }
}

/// Converters and field loaders keyed by field kind.
///
/// Registered before loading; read-only afterwards.
#[derive(Clone, Default)]
pub struct Converters {
    converters: HashMap<FieldKind, ConvertFn>,
    loaders: HashMap<FieldKind, FieldLoaderFn>,
}

impl Converters {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a converter for every field of `kind`, replacing any
    /// previous one.
    pub fn register_converter<F>(&mut self, kind: FieldKind, convert: F)
    where
        F: Fn(&str, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.converters.insert(kind, Arc::new(convert));
    }

    /// Registers a field loader for every field of `kind`, replacing any
    /// previous one.
    pub fn register_field_loader<F>(&mut self, kind: FieldKind, load: F)
    where
        F: Fn(&FieldInput<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.loaders.insert(kind, Arc::new(load));
    }

    /// Builder form of [`register_converter`](Self::register_converter).
    #[must_use]
    pub fn with_converter<F>(mut self, kind: FieldKind, convert: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_converter(kind, convert);
        self
    }

    /// Builder form of [`register_field_loader`](Self::register_field_loader).
    #[must_use]
    pub fn with_field_loader<F>(mut self, kind: FieldKind, load: F) -> Self
    where
        F: Fn(&FieldInput<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_field_loader(kind, load);
        self
    }

    /// Returns the converter registered for a kind.
    #[must_use]
    pub fn converter(&self, kind: &FieldKind) -> Option<&ConvertFn> {
        self.converters.get(kind)
    }

    /// Returns the field loader registered for a kind.
    #[must_use]
    pub fn field_loader(&self, kind: &FieldKind) -> Option<&FieldLoaderFn> {
        self.loaders.get(kind)
    }

    /// Merges another table into this one; entries in `other` win.
    pub fn extend(&mut self, other: Converters) {
        self.converters.extend(other.converters);
        self.loaders.extend(other.loaders);
    }
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converters")
            .field("converters", &self.converters.keys().collect::<Vec<_>>())
            .field("loaders", &self.loaders.keys().collect::<Vec<_>>())
            .finish()
    }
}
