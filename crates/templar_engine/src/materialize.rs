//! The attribute-driven materializer.
//!
//! Turns one stored record plus its already-materialized parent into a typed
//! template by walking the template type's [`Schema`].

use std::collections::BTreeSet;
use std::sync::Arc;

use templar_foundation::{Error, Result, Value};
use templar_storage::StoredRecord;
use tracing::{debug, trace, warn};

use crate::convert::{Converters, FieldInput};
use crate::merge::{merge, merge_all};
use crate::modifier::{Modifier, RecordModifiers};
use crate::schema::{FieldDescriptor, Template};

/// A materialized template and the fields supplied along its chain.
#[derive(Debug)]
pub struct Resolved<T> {
    /// The immutable template.
    pub template: Arc<T>,
    /// Source keys that some record in the chain provided.
    pub provided: BTreeSet<&'static str>,
}

impl<T> Clone for Resolved<T> {
    fn clone(&self) -> Self {
        Self {
            template: Arc::clone(&self.template),
            provided: self.provided.clone(),
        }
    }
}

/// Builds templates from records, one chain link at a time.
#[derive(Clone, Copy, Debug)]
pub struct Materializer<'a> {
    converters: &'a Converters,
}

impl<'a> Materializer<'a> {
    /// Creates a materializer using the given converter table.
    #[must_use]
    pub fn new(converters: &'a Converters) -> Self {
        Self { converters }
    }

    /// Materializes one record on top of its parent.
    ///
    /// Every schema field is resolved in declaration order:
    ///
    /// 1. a field loader registered for the field's kind owns the field
    /// 2. otherwise a per-field or per-kind converter turns the raw node into
    ///    a value
    /// 3. otherwise the raw node is decoded as a modifier and merged
    /// 4. record-level containers then apply on top
    ///
    /// Fields the record does not mention keep the parent's value, or the
    /// default at the root. When `check_required` is set, a required field
    /// that no record in the chain supplied is an error.
    ///
    /// # Errors
    ///
    /// Returns merge, conversion, and type-check errors, and
    /// `MissingRequiredField` when required fields are absent.
    pub fn materialize<T: Template>(
        &self,
        stored: &StoredRecord,
        parent: Option<&Resolved<T>>,
        check_required: bool,
    ) -> Result<Resolved<T>> {
        let schema = T::schema();
        let record = &stored.record;
        let modifiers = RecordModifiers::from_record(record)?;
        for key in modifiers.fields().filter(|key| schema.field(key).is_none()) {
            warn!(
                template_type = T::TYPE_NAME,
                identity = %stored.identity,
                field = key,
                "modifier container names a field the schema does not declare"
            );
        }

        let mut template = match parent {
            Some(parent) => T::clone(&parent.template),
            None => schema.prototype(),
        };
        let mut provided = parent.map(|p| p.provided.clone()).unwrap_or_default();

        for field in schema.fields() {
            let raw = record.get(field.key());
            if raw.is_none() && !modifiers.targets(field.key()) {
                continue;
            }
            if raw.is_some() && field.is_obsolete() {
                debug!(
                    template_type = T::TYPE_NAME,
                    identity = %stored.identity,
                    field = field.key(),
                    "record uses obsolete field"
                );
            }

            let inherited = parent.map(|p| field.read(&p.template));
            let value = self.resolve_field(field, stored, raw, inherited.as_ref(), &modifiers)?;
            field.write(&mut template, value)?;
            provided.insert(field.key());
        }

        let header = template.header_mut();
        header.id = stored.id().to_string();
        header.abstract_id = stored.is_abstract().then(|| stored.id().to_string());
        if let Some(tag) = record.type_tag() {
            header.type_tag = tag.to_string();
        }

        if check_required {
            if let Some(missing) = schema
                .fields()
                .iter()
                .find(|f| f.is_required() && !provided.contains(f.key()))
            {
                return Err(Error::missing_field(T::TYPE_NAME, missing.key()));
            }
        }

        trace!(
            template_type = T::TYPE_NAME,
            identity = %stored.identity,
            parent = ?stored.parent(),
            "materialized template"
        );
        Ok(Resolved {
            template: Arc::new(template),
            provided,
        })
    }

    fn resolve_field<T: Default>(
        &self,
        field: &FieldDescriptor<T>,
        stored: &StoredRecord,
        raw: Option<&Value>,
        inherited: Option<&Value>,
        modifiers: &RecordModifiers,
    ) -> Result<Value> {
        let key = field.key();
        let kind = field.kind();

        if let Some(load) = self.converters.field_loader(kind) {
            return load(&FieldInput {
                record: &stored.record,
                field: key,
                kind,
                raw: raw.unwrap_or(&Value::Null),
                parent: inherited,
                default: field.default(),
                modifiers,
            });
        }

        let own = match raw {
            None => None,
            Some(raw) => Some(
                match field
                    .converter()
                    .or_else(|| self.converters.converter(kind))
                {
                    Some(convert) => convert(key, raw)?,
                    None => merge(
                        key,
                        kind,
                        inherited,
                        field.default(),
                        normalize(field, Modifier::decode(key, raw)?),
                    )?,
                },
            ),
        };

        let base = own.as_ref().or(inherited);
        let contained = merge_all(
            key,
            kind,
            base,
            field.default(),
            modifiers
                .for_field(key)?
                .into_iter()
                .map(|modifier| normalize(field, modifier)),
        )?;
        contained
            .or(own)
            .ok_or_else(|| Error::internal(format!("field '{key}' resolved to nothing")))
    }
}

/// Shapes delete operands like stored elements, so a child can delete
/// exactly what its parent wrote even when the setter filled in defaults.
fn normalize<T: Default>(field: &FieldDescriptor<T>, modifier: Modifier) -> Modifier {
    match modifier {
        Modifier::Delete(items) => Modifier::Delete(field.normalize_items(items)),
        other => other,
    }
}
