//! Standard converters and field loaders.
//!
//! - `range` fields accept `n`, `[min, max]`, or `{"min": .., "max": ..}`
//!   and normalize to a two-element list
//! - `requirements` fields hold crafting components written as
//!   `["id", count]` or `["id", count, "NO_RECOVER"]`; the loader applies
//!   extend and delete itself because deletion matches on component id

use templar_engine::{Converters, FieldInput, Modifier};
use templar_foundation::{Error, FieldKind, IntoValue, List, Result, Value};

use crate::types::Component;

/// Field kind of inclusive integer ranges.
pub const RANGE: FieldKind = FieldKind::Custom("range");

/// Field kind of crafting component lists.
pub const REQUIREMENTS: FieldKind = FieldKind::Custom("requirements");

/// Flag marking a component as lost on disassembly.
pub const NO_RECOVER: &str = "NO_RECOVER";

/// Returns the standard converter table.
#[must_use]
pub fn standard_converters() -> Converters {
    Converters::new()
        .with_converter(RANGE, convert_range)
        .with_field_loader(REQUIREMENTS, load_requirements)
}

// =============================================================================
// Ranges
// =============================================================================

/// Normalizes a range node to `[min, max]`.
///
/// # Errors
///
/// Returns an invalid field value error for malformed ranges or when
/// `min > max`.
pub fn convert_range(field: &str, raw: &Value) -> Result<Value> {
    let (min, max) = match raw {
        Value::Int(n) => (*n, *n),
        Value::List(items) if items.len() == 2 => (
            range_bound(field, items.get(0))?,
            range_bound(field, items.get(1))?,
        ),
        Value::Map(_) => (
            range_bound(field, raw.get("min"))?,
            range_bound(field, raw.get("max"))?,
        ),
        other => {
            return Err(Error::invalid_field(
                field,
                format!("expected a number, a pair, or a min/max map, found {other}"),
            ));
        }
    };
    if min > max {
        return Err(Error::invalid_field(
            field,
            format!("range minimum {min} exceeds maximum {max}"),
        ));
    }
    Ok(vec![min, max].into())
}

fn range_bound(field: &str, value: Option<&Value>) -> Result<i64> {
    match value.and_then(|v| FieldKind::Int.coerce(v.clone())) {
        Some(Value::Int(n)) => Ok(n),
        _ => Err(Error::invalid_field(field, "range bounds must be integers")),
    }
}

// =============================================================================
// Requirements
// =============================================================================

/// Loads a component list, honoring extend and delete from both the field
/// wrapper and record-level containers.
///
/// # Errors
///
/// Returns an invalid field value error for malformed components, and a
/// modifier type mismatch for numeric modifiers.
pub fn load_requirements(input: &FieldInput<'_>) -> Result<Value> {
    let mut current = match input.inherited() {
        Value::List(items) => items.clone(),
        _ => List::new(),
    };

    if !input.raw.is_null() {
        let modifier = Modifier::decode(input.field, input.raw)?;
        current = apply(input.field, current, modifier)?;
    }
    for modifier in input.modifiers.for_field(input.field)? {
        current = apply(input.field, current, modifier)?;
    }
    Ok(Value::List(current))
}

fn apply(field: &str, current: List, modifier: Modifier) -> Result<List> {
    match modifier {
        Modifier::Absolute(value) => parse_components(field, &value),
        Modifier::Extend(items) => {
            let mut current = current;
            current.append(parse_components(field, &Value::List(items))?);
            Ok(current)
        }
        Modifier::Delete(items) => {
            let removed = items
                .iter()
                .map(|item| component_id(field, item))
                .collect::<Result<Vec<_>>>()?;
            let mut current = current;
            current.retain(|c| {
                c.get("id")
                    .and_then(Value::as_str)
                    .is_none_or(|id| !removed.iter().any(|r| *r == id))
            });
            Ok(current)
        }
        numeric @ (Modifier::Relative(_) | Modifier::Proportional(_)) => Err(
            Error::modifier_mismatch(field, numeric.op().key(), REQUIREMENTS.to_string()),
        ),
    }
}

fn parse_components(field: &str, value: &Value) -> Result<List> {
    match value {
        Value::List(items) => items
            .iter()
            .map(|item| parse_component(field, item).map(IntoValue::into_value))
            .collect(),
        Value::Null => Ok(List::new()),
        other => Err(Error::invalid_field(
            field,
            format!("expected a list of components, found {}", other.kind_name()),
        )),
    }
}

fn parse_component(field: &str, item: &Value) -> Result<Component> {
    let malformed = || {
        Error::invalid_field(
            field,
            format!("expected [\"id\", count] or [\"id\", count, \"{NO_RECOVER}\"], found {item}"),
        )
    };
    match item {
        Value::List(parts) if (2..=3).contains(&parts.len()) => {
            let id = parts.get(0).and_then(Value::as_str).ok_or_else(malformed)?;
            let count = parts.get(1).and_then(Value::as_int).ok_or_else(malformed)?;
            let recoverable = match parts.get(2) {
                None => true,
                Some(flag) if flag.as_str() == Some(NO_RECOVER) => false,
                Some(_) => return Err(malformed()),
            };
            if count <= 0 {
                return Err(Error::invalid_field(
                    field,
                    format!("component '{id}' needs a positive count, found {count}"),
                ));
            }
            Ok(Component {
                id: id.to_string(),
                count,
                recoverable,
            })
        }
        Value::Map(_) => {
            templar_foundation::FromValue::from_value(item).ok_or_else(malformed)
        }
        _ => Err(malformed()),
    }
}

fn component_id<'a>(field: &str, item: &'a Value) -> Result<&'a str> {
    match item {
        Value::String(id) => Ok(&**id),
        Value::List(parts) => parts
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_field(field, "delete entries need a component id")),
        Value::Map(_) => item
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_field(field, "delete entries need a component id")),
        other => Err(Error::invalid_field(
            field,
            format!("cannot delete component by {}", other.kind_name()),
        )),
    }
}
