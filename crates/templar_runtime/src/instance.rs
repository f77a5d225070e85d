//! Entity handles pairing a shared template with per-entity state.

use std::ops::Deref;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use templar_engine::{Template, Templates};
use templar_foundation::{Error, ErrorKind, Result};
use tracing::trace;

use crate::data::RuntimeData;
use crate::serial::SerialCounter;

/// The persisted form of one [`Instance`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedInstance {
    /// Serial of the entity.
    pub serial: u64,
    /// [`Template::TYPE_NAME`] of the bound template.
    pub template_type: String,
    /// Identifier of the bound template.
    pub template_id: String,
    /// The entity's runtime bag.
    pub runtime_data: RuntimeData,
}

/// One game-world entity: an immutable template, a private runtime bag, and
/// a serial.
///
/// The template binding and serial never change after construction.
/// Dereferences to the template for read access.
#[derive(Debug)]
pub struct Instance<T> {
    template: Arc<T>,
    data: RuntimeData,
    serial: u64,
}

impl<T: Template> Instance<T> {
    /// Binds a template, drawing a fresh serial from `counter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter has no serials left.
    pub fn new(template: Arc<T>, counter: &SerialCounter) -> Result<Self> {
        Ok(Self::with_serial(template, counter.next()?))
    }

    /// Binds a template with an explicit serial.
    #[must_use]
    pub fn with_serial(template: Arc<T>, serial: u64) -> Self {
        trace!(
            template_type = T::TYPE_NAME,
            template = template.id(),
            serial,
            "instantiated template"
        );
        Self {
            template,
            data: RuntimeData::new(),
            serial,
        }
    }

    /// Resolves `id` through `templates` and binds it.
    ///
    /// # Errors
    ///
    /// Returns any resolution error, e.g. `UnknownTemplate`.
    pub fn from_templates(
        templates: &mut Templates,
        id: &str,
        counter: &SerialCounter,
    ) -> Result<Self> {
        Self::new(templates.resolve::<T>(id)?, counter)
    }

    /// Rebuilds a saved entity on top of `template`, keeping its serial.
    ///
    /// The caller should also pass the serial to
    /// [`SerialCounter::observe`] before issuing new ones.
    ///
    /// # Errors
    ///
    /// Returns `RehydrationMismatch` if `saved` belongs to another template.
    pub fn restore(template: Arc<T>, saved: &SavedInstance) -> Result<Self> {
        let mut instance = Self::with_serial(template, saved.serial);
        instance.deserialize(saved)?;
        Ok(instance)
    }

    /// Returns the bound template.
    #[must_use]
    pub fn template(&self) -> &Arc<T> {
        &self.template
    }

    /// Returns the bound template's identifier.
    #[must_use]
    pub fn template_id(&self) -> &str {
        self.template.id()
    }

    /// Returns the serial.
    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Returns the runtime bag.
    #[must_use]
    pub fn data(&self) -> &RuntimeData {
        &self.data
    }

    /// Returns the runtime bag for mutation.
    pub fn data_mut(&mut self) -> &mut RuntimeData {
        &mut self.data
    }

    /// Captures this entity for saving.
    #[must_use]
    pub fn serialize(&self) -> SavedInstance {
        SavedInstance {
            serial: self.serial,
            template_type: T::TYPE_NAME.to_string(),
            template_id: self.template_id().to_string(),
            runtime_data: self.data.clone(),
        }
    }

    /// Replaces the runtime bag with the saved one.
    ///
    /// Never rebinds: the saved type and identifier must match this handle.
    /// The serial is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RehydrationMismatch` on any type or identifier difference.
    pub fn deserialize(&mut self, saved: &SavedInstance) -> Result<()> {
        if saved.template_type != T::TYPE_NAME || saved.template_id != self.template_id() {
            return Err(Error::new(ErrorKind::RehydrationMismatch {
                expected_type: T::TYPE_NAME.to_string(),
                expected_id: self.template_id().to_string(),
                found_type: saved.template_type.clone(),
                found_id: saved.template_id.clone(),
            }));
        }
        self.data = saved.runtime_data.clone();
        Ok(())
    }

    /// Returns a private deep copy of the template, made by a round trip
    /// through the save format.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the template does not round-trip.
    pub fn copy_data(&self) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let bytes = rmp_serde::to_vec_named(&*self.template)
            .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))?;
        rmp_serde::from_slice(&bytes)
            .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
    }
}

impl<T> Deref for Instance<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.template
    }
}
