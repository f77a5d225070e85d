//! Small value types shared by the reference schemas.

use serde::{Deserialize, Serialize};
use templar_foundation::{FromValue, IntoValue, Value};

/// A tool quality and its level, e.g. `CUT 2`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quality {
    /// Quality identifier.
    pub id: String,
    /// Quality level.
    pub level: i64,
}

impl Quality {
    /// Creates a quality.
    #[must_use]
    pub fn new(id: impl Into<String>, level: i64) -> Self {
        Self {
            id: id.into(),
            level,
        }
    }
}

impl FromValue for Quality {
    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            id: value.get("id")?.as_str()?.to_string(),
            level: value.get("level").map_or(Some(1), Value::as_int)?,
        })
    }
}

impl IntoValue for Quality {
    fn into_value(self) -> Value {
        Value::map_from([("id", Value::from(self.id)), ("level", Value::Int(self.level))])
    }
}

/// One crafting component: an item, how many, and whether it is
/// recovered on disassembly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    /// Item identifier.
    pub id: String,
    /// Quantity consumed.
    pub count: i64,
    /// False when the component is lost on disassembly.
    pub recoverable: bool,
}

impl Component {
    /// Creates a recoverable component.
    #[must_use]
    pub fn new(id: impl Into<String>, count: i64) -> Self {
        Self {
            id: id.into(),
            count,
            recoverable: true,
        }
    }
}

impl FromValue for Component {
    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            id: value.get("id")?.as_str()?.to_string(),
            count: value.get("count")?.as_int()?,
            recoverable: value.get("recoverable").map_or(Some(true), Value::as_bool)?,
        })
    }
}

impl IntoValue for Component {
    fn into_value(self) -> Value {
        Value::map_from([
            ("id", Value::from(self.id)),
            ("count", Value::Int(self.count)),
            ("recoverable", Value::Bool(self.recoverable)),
        ])
    }
}

/// An inclusive integer range, e.g. damage `[2, 6]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntRange {
    /// Lower bound.
    pub min: i64,
    /// Upper bound.
    pub max: i64,
}

impl IntRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

impl FromValue for IntRange {
    fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_list()?;
        if items.len() != 2 {
            return None;
        }
        Some(Self {
            min: items.get(0)?.as_int()?,
            max: items.get(1)?.as_int()?,
        })
    }
}

impl IntoValue for IntRange {
    fn into_value(self) -> Value {
        vec![self.min, self.max].into()
    }
}
