//! Raw records as parsed from external definitions.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind};
use crate::value::Value;

/// Key holding a record's concrete identifier.
pub const ID_KEY: &str = "id";
/// Key holding a record's abstract identifier.
pub const ABSTRACT_KEY: &str = "abstract";
/// Key holding the parent reference.
pub const COPY_FROM_KEY: &str = "copy-from";
/// Key holding the type tag that selects a namespace.
pub const TYPE_KEY: &str = "type";

/// One raw external definition: an ordered mapping from field name to value.
///
/// Records carry no identity of their own; the identifier resolver derives it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Value>,
    source: Option<Arc<str>>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a parsed JSON object.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `json` is not an object.
    pub fn from_json(json: &serde_json::Value) -> crate::Result<Self> {
        let object = json.as_object().ok_or_else(|| {
            Error::new(ErrorKind::ParseError(format!(
                "expected a JSON object for a record, found {json}"
            )))
        })?;
        Ok(Self {
            fields: object
                .iter()
                .map(|(k, v)| (k.clone(), Value::from_json(v)))
                .collect(),
            source: None,
        })
    }

    /// Parses JSON text holding either one record object or an array of them.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text is not valid JSON, or if any element
    /// is not an object.
    pub fn parse_many(text: &str) -> crate::Result<Vec<Self>> {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| Error::new(ErrorKind::ParseError(e.to_string())))?;
        match &json {
            serde_json::Value::Array(items) => items.iter().map(Self::from_json).collect(),
            _ => Ok(vec![Self::from_json(&json)?]),
        }
    }

    /// Sets the origin of this record, used in error context.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Builder method to set a field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Returns the origin of this record, if known.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Looks up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the `type` tag when it is a string.
    #[must_use]
    pub fn type_tag(&self) -> Option<&str> {
        self.get(TYPE_KEY).and_then(Value::as_str)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            source: None,
        }
    }
}
