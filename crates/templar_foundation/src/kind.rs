//! Field kind descriptors for schema validation.

use std::fmt;

use crate::value::Value;

/// Declared kind of a schema field.
///
/// Used to type-check merged values before they are stored on a template,
/// to decide which merge modifiers are legal, and to key custom converters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Accepts any value; merge legality is decided by the runtime value.
    Any,
    /// Boolean field.
    Bool,
    /// Integer field. Proportional merges truncate toward zero.
    Int,
    /// Floating point field. Accepts integers.
    Float,
    /// String field.
    String,
    /// Homogeneous list field.
    List(Box<FieldKind>),
    /// Nested map field.
    Map,
    /// Bespoke kind interpreted by a registered converter or field loader.
    Custom(&'static str),
}

impl FieldKind {
    /// Creates a list kind with the given element kind.
    #[must_use]
    pub fn list(element: FieldKind) -> Self {
        Self::List(Box::new(element))
    }

    /// Returns true for `Int` and `Float`.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Returns true for list kinds.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns the element kind of a list kind.
    #[must_use]
    pub fn element(&self) -> Option<&FieldKind> {
        match self {
            Self::List(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the neutral value for this kind, used when a schema declares
    /// no explicit default.
    #[must_use]
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::String => Value::from(""),
            Self::List(_) => Value::List(crate::List::new()),
            Self::Map => Value::Map(crate::Map::new()),
            Self::Any | Self::Custom(_) => Value::Null,
        }
    }

    /// Checks a value against this kind, applying numeric coercions.
    ///
    /// - `Float` accepts integers (promoted)
    /// - `Int` accepts floats with no fractional part that fit in an `i64`
    /// - `Any` and `Custom` accept every value
    /// - `Null` is accepted everywhere as "unset"
    /// - list kinds check every element recursively
    ///
    /// Returns `None` if the value does not fit.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::float_cmp
    )]
    pub fn coerce(&self, value: Value) -> Option<Value> {
        match (self, value) {
            (_, Value::Null) => Some(Value::Null),
            (Self::Any | Self::Custom(_), v) => Some(v),
            (Self::Bool, v @ Value::Bool(_))
            | (Self::Int, v @ Value::Int(_))
            | (Self::Float, v @ Value::Float(_))
            | (Self::String, v @ Value::String(_))
            | (Self::Map, v @ Value::Map(_)) => Some(v),
            (Self::Float, Value::Int(n)) => Some(Value::Float(n as f64)),
            (Self::Int, Value::Float(f))
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
            {
                Some(Value::Int(f as i64))
            }
            (Self::List(element), Value::List(items)) => items
                .into_iter()
                .map(|item| element.coerce(item))
                .collect::<Option<_>>()
                .map(Value::List),
            _ => None,
        }
    }

    /// Returns true if the value fits this kind without coercion loss.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        self.coerce(value.clone()).is_some()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::List(element) => write!(f, "list<{element}>"),
            Self::Map => write!(f, "map"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}
