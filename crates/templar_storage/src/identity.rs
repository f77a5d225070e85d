//! Canonical identifiers for raw records.
//!
//! Resolution is pure: it reads the record and the namespace rule and never
//! touches the store, so chain walks may call it speculatively.

use std::fmt;

use templar_foundation::record::{ABSTRACT_KEY, ID_KEY};
use templar_foundation::{Error, Record, Result, Value};

use crate::namespace::{IdRule, NamespaceConfig};

/// The resolved identity of a record within its namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Canonical identifier.
    pub id: String,
    /// True if declared through `abstract`.
    pub is_abstract: bool,
}

impl Identity {
    /// Creates a concrete identity.
    #[must_use]
    pub fn concrete(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_abstract: false,
        }
    }

    /// Creates an abstract identity.
    #[must_use]
    pub fn abstract_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_abstract: true,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_abstract {
            write!(f, "abstract '{}'", self.id)
        } else {
            write!(f, "'{}'", self.id)
        }
    }
}

/// Computes the canonical identity of a record.
///
/// # Errors
///
/// Returns a malformed record error if identity fields have the wrong type,
/// if both `id` and `abstract` are declared, or if no rule yields a
/// non-empty identifier.
pub fn resolve_identity(record: &Record, namespace: &NamespaceConfig) -> Result<Identity> {
    let ns = namespace.name.as_str();
    let identity = declared_identity(record, namespace)?;
    if identity.id.is_empty() {
        return Err(Error::malformed(ns, "record resolves to an empty identifier"));
    }
    Ok(identity)
}

fn declared_identity(record: &Record, namespace: &NamespaceConfig) -> Result<Identity> {
    let ns = namespace.name.as_str();
    let id = string_field(record, ns, ID_KEY)?;
    let abstract_id = string_field(record, ns, ABSTRACT_KEY)?;

    match (id, abstract_id) {
        (Some(id), None) => Ok(Identity::concrete(id)),
        (None, Some(abstract_id)) => Ok(Identity::abstract_id(abstract_id)),
        (Some(id), Some(abstract_id)) => Err(Error::malformed(
            ns,
            format!("record declares both id '{id}' and abstract '{abstract_id}'"),
        )),
        (None, None) => fallback_identity(record, namespace).map(Identity::concrete),
    }
}

fn fallback_identity(record: &Record, namespace: &NamespaceConfig) -> Result<String> {
    let ns = namespace.name.as_str();
    match namespace.id_rule {
        IdRule::Explicit => Err(Error::malformed(
            ns,
            "record has neither 'id' nor 'abstract'",
        )),
        IdRule::ResultWithSuffix => {
            let result = string_field(record, ns, "result")?.ok_or_else(|| {
                Error::malformed(ns, "record has none of 'id', 'abstract' or 'result'")
            })?;
            match string_field(record, ns, "id_suffix")? {
                Some(suffix) if !suffix.is_empty() => Ok(format!("{result}_{suffix}")),
                _ => Ok(result.to_string()),
            }
        }
        IdRule::CategoryDescription => {
            let category = string_field(record, ns, "category")?;
            let description = string_field(record, ns, "description")?;
            match (category, description) {
                (Some(category), Some(description)) => {
                    Ok(normalize(&format!("{category} {description}")))
                }
                (None, _) => Err(Error::malformed(
                    ns,
                    "record has none of 'id', 'abstract' or 'category'",
                )),
                (_, None) => Err(Error::malformed(
                    ns,
                    "record has none of 'id', 'abstract' or 'description'",
                )),
            }
        }
    }
}

/// Reads an optional string field, rejecting any other value type.
fn string_field<'a>(record: &'a Record, namespace: &str, key: &str) -> Result<Option<&'a str>> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_ref())),
        Some(other) => Err(Error::malformed(
            namespace,
            format!("'{key}' must be a string, found {}", other.kind_name()),
        )),
    }
}

/// Lowercases and collapses every run of non-alphanumeric characters to `_`.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}
