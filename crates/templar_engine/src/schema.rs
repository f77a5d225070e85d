//! Static field-descriptor tables for template types.
//!
//! Every template type lists its loadable fields once, in a [`Schema`] built
//! on first use. The materializer walks that table instead of inspecting the
//! type at runtime.
//!
//! ```ignore
//! impl Template for ToolTemplate {
//!     const NAMESPACE: &'static str = "item";
//!     const TYPE_NAME: &'static str = "ToolTemplate";
//!
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: OnceLock<Schema<ToolTemplate>> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::builder(Self::TYPE_NAME)
//!                 .field(field!(ToolTemplate, max_charges, FieldKind::Int))
//!                 .build()
//!         })
//!     }
//!     // header accessors...
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use templar_foundation::record::{ABSTRACT_KEY, COPY_FROM_KEY, ID_KEY, TYPE_KEY};
use templar_foundation::{Error, FieldKind, List, Result, Value};

use crate::convert::ConvertFn;
use crate::modifier::is_container_key;

// =============================================================================
// Template
// =============================================================================

/// Identity stamped on every materialized template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateHeader {
    /// Canonical identifier.
    pub id: String,
    /// Set when the template was declared through `abstract`.
    pub abstract_id: Option<String>,
    /// The record's `type` tag.
    pub type_tag: String,
}

impl TemplateHeader {
    /// Returns true for abstract templates.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.abstract_id.is_some()
    }
}

/// A typed, immutable template materialized from records.
pub trait Template: Clone + Default + Send + Sync + 'static {
    /// Namespace this template type is loaded from.
    const NAMESPACE: &'static str;

    /// Name used in errors and save data.
    const TYPE_NAME: &'static str;

    /// Returns the field table, built once.
    fn schema() -> &'static Schema<Self>;

    /// Returns the identity header.
    fn header(&self) -> &TemplateHeader;

    /// Returns the identity header for stamping.
    fn header_mut(&mut self) -> &mut TemplateHeader;

    /// Returns the canonical identifier.
    fn id(&self) -> &str {
        &self.header().id
    }
}

// =============================================================================
// Field descriptors
// =============================================================================

/// Reads a field off a template.
pub type Getter<T> = fn(&T) -> Value;

/// Writes a field onto a template; `None` if the value has the wrong shape.
pub type Setter<T> = fn(&mut T, &Value) -> Option<()>;

/// One loadable field of a template type.
pub struct FieldDescriptor<T> {
    key: &'static str,
    kind: FieldKind,
    default: Value,
    required: bool,
    obsolete: bool,
    arity: Option<usize>,
    converter: Option<ConvertFn>,
    get: Getter<T>,
    set: Setter<T>,
}

impl<T> FieldDescriptor<T> {
    /// Creates a descriptor whose default is the kind's neutral value.
    #[must_use]
    pub fn new(key: &'static str, kind: FieldKind, get: Getter<T>, set: Setter<T>) -> Self {
        Self {
            key,
            default: kind.zero_value(),
            kind,
            required: false,
            obsolete: false,
            arity: None,
            converter: None,
            get,
            set,
        }
    }

    /// Sets the default used at the root of a chain.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// Marks the field as required somewhere along the chain.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as obsolete; it still loads but logs its use.
    #[must_use]
    pub fn obsolete(mut self) -> Self {
        self.obsolete = true;
        self
    }

    /// Requires list values to have exactly `arity` elements.
    #[must_use]
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Sets a per-field converter, taking precedence over kind converters.
    #[must_use]
    pub fn with_converter<F>(mut self, convert: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.converter = Some(Arc::new(convert));
        self
    }

    /// Source key in record data.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Declared kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Default value.
    #[must_use]
    pub fn default(&self) -> &Value {
        &self.default
    }

    /// Whether the field is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the field is obsolete.
    #[must_use]
    pub fn is_obsolete(&self) -> bool {
        self.obsolete
    }

    /// Fixed element count, if any.
    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Per-field converter, if any.
    #[must_use]
    pub fn converter(&self) -> Option<&ConvertFn> {
        self.converter.as_ref()
    }

    /// Reads the field's current value.
    #[must_use]
    pub fn read(&self, template: &T) -> Value {
        (self.get)(template)
    }

    /// Type-checks a value against the field's kind and arity.
    ///
    /// Returns the value after numeric coercion.
    ///
    /// # Errors
    ///
    /// Returns a field type mismatch or an arity mismatch.
    pub fn check(&self, value: Value) -> Result<Value> {
        let actual = value.kind_name();
        let value = self
            .kind
            .coerce(value)
            .ok_or_else(|| Error::field_type_mismatch(self.key, self.kind.to_string(), actual))?;

        if let (Some(expected), Value::List(items)) = (self.arity, &value) {
            if items.len() != expected {
                return Err(Error::new(templar_foundation::ErrorKind::ArityMismatch {
                    field: self.key.to_string(),
                    expected,
                    actual: items.len(),
                }));
            }
        }
        Ok(value)
    }

    /// Passes list items through the setter and getter one at a time, so
    /// they take the shape of elements this field has already stored.
    ///
    /// Items the element kind or the setter rejects come back unchanged.
    #[must_use]
    pub fn normalize_items(&self, items: List) -> List
    where
        T: Default,
    {
        let Some(element) = self.kind.element() else {
            return items;
        };
        let mut scratch = T::default();
        items
            .into_iter()
            .map(|item| {
                let Some(single) = self.kind.coerce(Value::List(List::unit(item.clone()))) else {
                    return item;
                };
                if (self.set)(&mut scratch, &single).is_none() {
                    return element.coerce(item.clone()).unwrap_or(item);
                }
                match (self.get)(&scratch) {
                    Value::List(stored) if stored.len() == 1 => stored[0].clone(),
                    _ => item,
                }
            })
            .collect()
    }

    /// Checks a value and stores it on the template.
    ///
    /// # Errors
    ///
    /// Returns a type or arity mismatch, or a field type mismatch if the
    /// setter rejects the value's shape.
    pub fn write(&self, template: &mut T, value: Value) -> Result<()> {
        let value = self.check(value)?;
        (self.set)(template, &value).ok_or_else(|| {
            Error::field_type_mismatch(self.key, self.kind.to_string(), value.kind_name())
        })
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("obsolete", &self.obsolete)
            .field("arity", &self.arity)
            .field("converter", &self.converter.is_some())
            .finish_non_exhaustive()
    }
}

/// Builds a [`FieldDescriptor`] for a struct field through
/// [`FromValue`](templar_foundation::FromValue) and
/// [`IntoValue`](templar_foundation::IntoValue).
///
/// The source key defaults to the field name.
#[macro_export]
macro_rules! field {
    ($ty:ty, $field:ident, $kind:expr) => {
        $crate::field!($ty, $field, stringify!($field), $kind)
    };
    ($ty:ty, $field:ident, $key:expr, $kind:expr) => {
        $crate::schema::FieldDescriptor::<$ty>::new(
            $key,
            $kind,
            |t: &$ty| {
                $crate::foundation::IntoValue::into_value(::std::clone::Clone::clone(&t.$field))
            },
            |t: &mut $ty, v: &$crate::foundation::Value| {
                t.$field = $crate::foundation::FromValue::from_value(v)?;
                ::std::option::Option::Some(())
            },
        )
    };
}

// =============================================================================
// Schema
// =============================================================================

/// The ordered field table of one template type.
pub struct Schema<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    index: HashMap<&'static str, usize>,
}

impl<T: Default> Schema<T> {
    /// Starts building a schema.
    #[must_use]
    pub fn builder(type_name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            type_name,
            fields: Vec::new(),
        }
    }

    /// Returns the type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns every field in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Looks up a field by source key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor<T>> {
        self.index.get(key).map(|&i| &self.fields[i])
    }

    /// Returns a template with every field set to its default.
    #[must_use]
    pub fn prototype(&self) -> T {
        let mut template = T::default();
        for field in &self.fields {
            // Defaults are validated when the schema is built.
            let _ = field.write(&mut template, field.default.clone());
        }
        template
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Schema`].
pub struct SchemaBuilder<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: Default> SchemaBuilder<T> {
    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Finishes the schema.
    ///
    /// # Panics
    ///
    /// Panics if two fields share a key, if a key collides with an identity
    /// key (`id`, `abstract`, `copy-from`, `type`) or a record-level modifier
    /// container, or if a default does not fit its field. These are
    /// programming errors in the schema declaration.
    #[must_use]
    pub fn build(self) -> Schema<T> {
        let mut index = HashMap::with_capacity(self.fields.len());
        let mut scratch = T::default();
        for (i, field) in self.fields.iter().enumerate() {
            let key = field.key;
            assert!(
                ![ID_KEY, ABSTRACT_KEY, COPY_FROM_KEY, TYPE_KEY].contains(&key)
                    && !is_container_key(key),
                "{}: field '{key}' uses a reserved key",
                self.type_name
            );
            assert!(
                index.insert(key, i).is_none(),
                "{}: field '{key}' declared twice",
                self.type_name
            );
            if let Err(e) = field.write(&mut scratch, field.default.clone()) {
                panic!("{}: bad default for '{key}': {e}", self.type_name);
            }
        }
        Schema {
            type_name: self.type_name,
            fields: self.fields,
            index,
        }
    }
}
