//! Per-entity runtime state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use templar_foundation::{FromValue, IntoValue, Value};

/// A mutable, string-keyed bag of values owned by one entity.
///
/// Keys keep insertion order so saved data is stable across runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeData {
    entries: IndexMap<String, Value>,
}

impl RuntimeData {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the value under `key` converted to `T`.
    ///
    /// `None` if the key is missing or holds a value of another shape.
    #[must_use]
    pub fn get_as<T: FromValue>(&self, key: &str) -> Option<T> {
        self.entries.get(key).and_then(T::from_value)
    }

    /// Stores a value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl IntoValue) -> Option<Value> {
        self.entries.insert(key.into(), value.into_value())
    }

    /// Removes a key, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Into<String>, V: IntoValue> FromIterator<(K, V)> for RuntimeData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into_value()))
                .collect(),
        }
    }
}
