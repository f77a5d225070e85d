//! Merge modifiers, decoded once per field.
//!
//! A field value is either a bare value (an absolute override) or a wrapper
//! map holding exactly one modifier key:
//!
//! ```json
//! { "max_charges": { "relative": -20 } }
//! ```
//!
//! Records may also carry record-level containers that apply a modifier to
//! several fields at once:
//!
//! ```json
//! { "relative": { "max_charges": 5, "weight": -10 } }
//! ```

use std::fmt;

use templar_foundation::{Error, List, Map, Record, Result, Value};

/// Key of the absolute modifier.
pub const ABSOLUTE: &str = "absolute";
/// Key of the relative modifier.
pub const RELATIVE: &str = "relative";
/// Key of the proportional modifier.
pub const PROPORTIONAL: &str = "proportional";
/// Key of the extend modifier.
pub const EXTEND: &str = "extend";
/// Key of the delete modifier.
pub const DELETE: &str = "delete";

/// Keys that may appear as record-level containers.
pub const CONTAINER_KEYS: [&str; 4] = [RELATIVE, PROPORTIONAL, EXTEND, DELETE];

// =============================================================================
// Modifier
// =============================================================================

/// The operation a modifier performs, without its operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModifierOp {
    /// Replace the inherited value.
    Absolute,
    /// Add to the inherited value.
    Relative,
    /// Multiply the inherited value.
    Proportional,
    /// Append to the inherited list.
    Extend,
    /// Remove from the inherited list.
    Delete,
}

impl ModifierOp {
    /// Returns the key naming this operation in record data.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Absolute => ABSOLUTE,
            Self::Relative => RELATIVE,
            Self::Proportional => PROPORTIONAL,
            Self::Extend => EXTEND,
            Self::Delete => DELETE,
        }
    }

    /// Parses a modifier key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            ABSOLUTE => Some(Self::Absolute),
            RELATIVE => Some(Self::Relative),
            PROPORTIONAL => Some(Self::Proportional),
            EXTEND => Some(Self::Extend),
            DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for ModifierOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A decoded merge modifier with its operand.
#[derive(Clone, Debug, PartialEq)]
pub enum Modifier {
    /// Replace the inherited value.
    Absolute(Value),
    /// Add a numeric delta.
    Relative(Value),
    /// Multiply by a numeric factor.
    Proportional(Value),
    /// Append items, keeping duplicates.
    Extend(List),
    /// Remove every element equal to one of the items.
    Delete(List),
}

impl Modifier {
    /// Returns the operation of this modifier.
    #[must_use]
    pub const fn op(&self) -> ModifierOp {
        match self {
            Self::Absolute(_) => ModifierOp::Absolute,
            Self::Relative(_) => ModifierOp::Relative,
            Self::Proportional(_) => ModifierOp::Proportional,
            Self::Extend(_) => ModifierOp::Extend,
            Self::Delete(_) => ModifierOp::Delete,
        }
    }

    /// Decodes a raw field value.
    ///
    /// A map with exactly one modifier key is a wrapper; anything else is an
    /// absolute value.
    ///
    /// # Errors
    ///
    /// Returns an invalid field value error if a relative or proportional
    /// operand is not numeric.
    pub fn decode(field: &str, raw: &Value) -> Result<Self> {
        if let Value::Map(map) = raw {
            if map.len() == 1 {
                if let Some((key, operand)) = map.iter().next() {
                    if let Some(op) = ModifierOp::from_key(key) {
                        return Self::from_op(field, op, operand.clone());
                    }
                }
            }
        }
        Ok(Self::Absolute(raw.clone()))
    }

    /// Builds a modifier from an operation and its operand.
    ///
    /// Extend and delete accept a single item in place of a list.
    ///
    /// # Errors
    ///
    /// Returns an invalid field value error if a relative or proportional
    /// operand is not numeric.
    pub fn from_op(field: &str, op: ModifierOp, operand: Value) -> Result<Self> {
        match op {
            ModifierOp::Absolute => Ok(Self::Absolute(operand)),
            ModifierOp::Relative | ModifierOp::Proportional => {
                if !operand.is_numeric() {
                    return Err(Error::invalid_field(
                        field,
                        format!("'{op}' expects a number, found {}", operand.kind_name()),
                    ));
                }
                Ok(if op == ModifierOp::Relative {
                    Self::Relative(operand)
                } else {
                    Self::Proportional(operand)
                })
            }
            ModifierOp::Extend => Ok(Self::Extend(into_items(operand))),
            ModifierOp::Delete => Ok(Self::Delete(into_items(operand))),
        }
    }
}

fn into_items(operand: Value) -> List {
    match operand {
        Value::List(items) => items,
        Value::Null => List::new(),
        item => List::unit(item),
    }
}

// =============================================================================
// Record-level containers
// =============================================================================

/// Record-level modifier containers of a single record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordModifiers {
    containers: Vec<(ModifierOp, Map)>,
}

impl RecordModifiers {
    /// Collects every container declared on a record, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an invalid field value error if a container is not a map.
    pub fn from_record(record: &Record) -> Result<Self> {
        let mut containers = Vec::new();
        for (key, value) in record.iter() {
            let Some(op) = ModifierOp::from_key(key).filter(|_| is_container_key(key)) else {
                continue;
            };
            match value {
                Value::Map(map) => containers.push((op, map.clone())),
                Value::Null => {}
                other => {
                    return Err(Error::invalid_field(
                        key,
                        format!(
                            "record-level '{op}' must map fields to operands, found {}",
                            other.kind_name()
                        ),
                    ));
                }
            }
        }
        Ok(Self { containers })
    }

    /// Returns the modifiers targeting one field, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if an operand does not decode.
    pub fn for_field(&self, field: &str) -> Result<Vec<Modifier>> {
        self.containers
            .iter()
            .filter_map(|(op, map)| map.get(field).map(|operand| (*op, operand)))
            .map(|(op, operand)| Modifier::from_op(field, op, operand.clone()))
            .collect()
    }

    /// Returns true if any container names the field.
    #[must_use]
    pub fn targets(&self, field: &str) -> bool {
        self.containers.iter().any(|(_, map)| map.contains_key(field))
    }

    /// Iterates over every field targeted by some container.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.containers
            .iter()
            .flat_map(|(_, map)| map.keys().map(|k| &**k))
    }

    /// Returns true if the record declared no containers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// Returns true if `key` names a record-level container.
#[must_use]
pub fn is_container_key(key: &str) -> bool {
    CONTAINER_KEYS.contains(&key)
}
