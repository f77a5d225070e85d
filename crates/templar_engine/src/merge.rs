//! The field merge engine.
//!
//! Combines an inherited value with a decoded [`Modifier`]. Merging is pure:
//! the same parent, default, and modifier always give the same result.

use templar_foundation::{Error, FieldKind, List, Result, Value};

use crate::modifier::{Modifier, ModifierOp};

/// Merges one field.
///
/// `parent` is the value inherited from the parent template, or `None` at
/// the root of a chain, where `default` stands in for it:
///
/// - `Absolute` replaces the inherited value
/// - `Relative` adds its delta; at the root the delta is the full value
/// - `Proportional` multiplies; integer results truncate toward zero
/// - `Extend` appends items after the inherited list
/// - `Delete` removes every element equal to one of the items, after the
///   items are coerced to the list's element kind
///
/// # Errors
///
/// Returns a modifier type mismatch when a numeric modifier targets a
/// non-numeric field or a list modifier targets a non-list field, and an
/// invalid field value error when integer arithmetic overflows.
pub fn merge(
    field: &str,
    kind: &FieldKind,
    parent: Option<&Value>,
    default: &Value,
    modifier: Modifier,
) -> Result<Value> {
    let op = modifier.op();
    let base = parent.unwrap_or(default);
    match modifier {
        Modifier::Absolute(value) => Ok(value),
        Modifier::Relative(delta) => {
            check_numeric(field, kind, op, base)?;
            match parent {
                Some(parent) => add(field, op, parent, &delta),
                None => add(field, op, &kind.zero_value(), &delta),
            }
        }
        Modifier::Proportional(factor) => {
            check_numeric(field, kind, op, base)?;
            multiply(field, op, base, &factor)
        }
        Modifier::Extend(items) => {
            let mut list = base_list(field, kind, op, base)?;
            list.append(items);
            Ok(Value::List(list))
        }
        Modifier::Delete(items) => {
            let mut list = base_list(field, kind, op, base)?;
            let items: List = match kind.element() {
                Some(element) => items
                    .into_iter()
                    .map(|item| element.coerce(item.clone()).unwrap_or(item))
                    .collect(),
                None => items,
            };
            list.retain(|element| !items.contains(element));
            Ok(Value::List(list))
        }
    }
}

/// Applies several modifiers in order, threading each result into the next.
///
/// # Errors
///
/// Stops at the first failing merge.
pub fn merge_all(
    field: &str,
    kind: &FieldKind,
    parent: Option<&Value>,
    default: &Value,
    modifiers: impl IntoIterator<Item = Modifier>,
) -> Result<Option<Value>> {
    let mut current: Option<Value> = None;
    for modifier in modifiers {
        let inherited = current.as_ref().or(parent);
        current = Some(merge(field, kind, inherited, default, modifier)?);
    }
    Ok(current)
}

fn mismatch(field: &str, op: ModifierOp, kind: impl ToString) -> Error {
    Error::modifier_mismatch(field, op.key(), kind.to_string())
}

fn check_numeric(field: &str, kind: &FieldKind, op: ModifierOp, base: &Value) -> Result<()> {
    match kind {
        FieldKind::Int | FieldKind::Float => Ok(()),
        FieldKind::Any if base.is_numeric() || base.is_null() => Ok(()),
        FieldKind::Any => Err(mismatch(field, op, base.kind_name())),
        other => Err(mismatch(field, op, other)),
    }
}

fn base_list(field: &str, kind: &FieldKind, op: ModifierOp, base: &Value) -> Result<List> {
    if !(kind.is_list() || matches!(kind, FieldKind::Any)) {
        return Err(mismatch(field, op, kind));
    }
    match base {
        Value::List(list) => Ok(list.clone()),
        Value::Null => Ok(List::new()),
        other => Err(mismatch(field, op, other.kind_name())),
    }
}

#[allow(clippy::cast_precision_loss)]
fn add(field: &str, op: ModifierOp, base: &Value, delta: &Value) -> Result<Value> {
    match (base, delta) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(*b)
            .map(Value::Int)
            .ok_or_else(|| overflow(field, op)),
        (Value::Int(a), Value::Float(b)) => truncate(field, op, *a as f64 + b),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Null, delta) => Ok(delta.clone()),
        (other, _) => Err(mismatch(field, op, other.kind_name())),
    }
}

#[allow(clippy::cast_precision_loss)]
fn multiply(field: &str, op: ModifierOp, base: &Value, factor: &Value) -> Result<Value> {
    let Some(f) = factor.as_number() else {
        return Err(mismatch(field, op, factor.kind_name()));
    };
    match base {
        Value::Int(a) => truncate(field, op, *a as f64 * f),
        Value::Float(a) => Ok(Value::Float(a * f)),
        Value::Null => Ok(Value::Null),
        other => Err(mismatch(field, op, other.kind_name())),
    }
}

/// Truncates toward zero, rejecting results outside the `i64` range.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate(field: &str, op: ModifierOp, value: f64) -> Result<Value> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(overflow(field, op));
    }
    Ok(Value::Int(truncated as i64))
}

fn overflow(field: &str, op: ModifierOp) -> Error {
    Error::invalid_field(field, format!("'{op}' overflows the integer range"))
}
