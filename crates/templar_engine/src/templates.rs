//! The multi-namespace template facade.
//!
//! [`Templates`] owns the record store, the converter table, and one
//! registry per registered template type, and routes lookups by type or by
//! namespace name.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use templar_foundation::{Error, Result};
use templar_storage::RecordStore;
use tracing::debug;

use crate::convert::Converters;
use crate::registry::{LoadState, TemplateRegistry};
use crate::schema::Template;

/// A type-erased template, as returned by [`Templates::resolve_dyn`].
pub type AnyTemplate = Arc<dyn Any + Send + Sync>;

/// Object-safe view of a [`TemplateRegistry`].
trait ErasedRegistry: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn state(&self) -> LoadState;
    fn load_abstracts(&mut self, store: &RecordStore, converters: &Converters) -> Result<usize>;
    fn load_concrete(&mut self, store: &RecordStore, converters: &Converters) -> Result<usize>;
    fn resolve_any(&mut self, store: &RecordStore, converters: &Converters, id: &str)
    -> Result<AnyTemplate>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Template> ErasedRegistry for TemplateRegistry<T> {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn state(&self) -> LoadState {
        TemplateRegistry::state(self)
    }

    fn load_abstracts(&mut self, store: &RecordStore, converters: &Converters) -> Result<usize> {
        TemplateRegistry::load_abstracts(self, store, converters)
    }

    fn load_concrete(&mut self, store: &RecordStore, converters: &Converters) -> Result<usize> {
        TemplateRegistry::load_concrete(self, store, converters)
    }

    fn resolve_any(
        &mut self,
        store: &RecordStore,
        converters: &Converters,
        id: &str,
    ) -> Result<AnyTemplate> {
        let template: AnyTemplate = self.resolve(store, converters, id)?;
        Ok(template)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Every template registry of a game, over one shared record store.
pub struct Templates {
    store: RecordStore,
    converters: Converters,
    registries: Vec<Box<dyn ErasedRegistry>>,
    by_type: HashMap<TypeId, usize>,
    by_namespace: HashMap<&'static str, usize>,
}

impl Templates {
    /// Creates a facade with no registered template types.
    #[must_use]
    pub fn new(store: RecordStore, converters: Converters) -> Self {
        Self {
            store,
            converters,
            registries: Vec::new(),
            by_type: HashMap::new(),
            by_namespace: HashMap::new(),
        }
    }

    /// Registers a template type for its namespace.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNamespace` if the store has no such namespace, or an
    /// internal error if the namespace or type is already registered.
    pub fn register<T: Template>(&mut self) -> Result<()> {
        self.store.require_namespace(T::NAMESPACE)?;
        if let Some(&existing) = self.by_namespace.get(T::NAMESPACE) {
            return Err(Error::internal(format!(
                "namespace '{}' already bound to {}",
                T::NAMESPACE,
                self.registries[existing].type_name()
            )));
        }
        if self.by_type.contains_key(&TypeId::of::<T>()) {
            return Err(Error::internal(format!(
                "{} registered twice",
                T::TYPE_NAME
            )));
        }

        let index = self.registries.len();
        self.registries.push(Box::new(TemplateRegistry::<T>::new()));
        self.by_type.insert(TypeId::of::<T>(), index);
        self.by_namespace.insert(T::NAMESPACE, index);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn with_template<T: Template>(mut self) -> Result<Self> {
        self.register::<T>()?;
        Ok(self)
    }

    /// Returns the record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Returns the converter table.
    #[must_use]
    pub fn converters(&self) -> &Converters {
        &self.converters
    }

    /// Returns the typed registry for `T`.
    #[must_use]
    pub fn registry<T: Template>(&self) -> Option<&TemplateRegistry<T>> {
        let index = *self.by_type.get(&TypeId::of::<T>())?;
        self.registries[index].as_any().downcast_ref()
    }

    fn typed_index<T: Template>(&self) -> Result<usize> {
        self.by_type
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or_else(|| Error::internal(format!("{} is not registered", T::TYPE_NAME)))
    }

    fn index_of(&self, namespace: &str) -> Result<usize> {
        self.by_namespace
            .get(namespace)
            .copied()
            .ok_or_else(|| Error::unknown_namespace(namespace))
    }

    /// Resolves a concrete template by type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTemplate` for unknown identifiers, or any resolution
    /// error.
    pub fn resolve<T: Template>(&mut self, id: &str) -> Result<Arc<T>> {
        let index = self.typed_index::<T>()?;
        downcast_mut::<T>(self.registries[index].as_mut())?.resolve(&self.store, &self.converters, id)
    }

    /// Resolves an abstract template by type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTemplate` for unknown identifiers, or any resolution
    /// error.
    pub fn resolve_abstract<T: Template>(&mut self, id: &str) -> Result<Arc<T>> {
        let index = self.typed_index::<T>()?;
        downcast_mut::<T>(self.registries[index].as_mut())?.resolve_abstract(
            &self.store,
            &self.converters,
            id,
        )
    }

    /// Returns an already materialized concrete template.
    #[must_use]
    pub fn get<T: Template>(&self, id: &str) -> Option<Arc<T>> {
        self.registry::<T>()?.get(id)
    }

    /// Resolves a concrete template by namespace name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNamespace` if no template type is registered for the
    /// namespace, or any resolution error.
    pub fn resolve_dyn(&mut self, namespace: &str, id: &str) -> Result<AnyTemplate> {
        let index = self.index_of(namespace)?;
        self.registries[index].resolve_any(&self.store, &self.converters, id)
    }

    /// Materializes every abstract record of a namespace.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNamespace` or the first resolution error.
    pub fn load_abstracts(&mut self, namespace: &str) -> Result<usize> {
        let index = self.index_of(namespace)?;
        self.registries[index].load_abstracts(&self.store, &self.converters)
    }

    /// Materializes every record of a namespace.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNamespace` or the first resolution error.
    pub fn load_concrete(&mut self, namespace: &str) -> Result<usize> {
        let index = self.index_of(namespace)?;
        self.registries[index].load_concrete(&self.store, &self.converters)
    }

    /// Loads every registered namespace, abstracts of all namespaces first.
    ///
    /// Returns the total number of concrete templates.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error.
    pub fn load_all(&mut self) -> Result<usize> {
        for registry in &mut self.registries {
            registry.load_abstracts(&self.store, &self.converters)?;
        }
        let mut total = 0;
        for registry in &mut self.registries {
            total += registry.load_concrete(&self.store, &self.converters)?;
        }
        debug!(
            namespaces = self.registries.len(),
            templates = total,
            "loaded all templates"
        );
        Ok(total)
    }

    /// Returns the load state of a namespace, if a type is registered for it.
    #[must_use]
    pub fn state(&self, namespace: &str) -> Option<LoadState> {
        let index = self.index_of(namespace).ok()?;
        Some(self.registries[index].state())
    }

    /// Iterates over registered namespaces.
    pub fn namespaces(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_namespace.keys().copied()
    }
}

fn downcast_mut<T: Template>(
    registry: &mut dyn ErasedRegistry,
) -> Result<&mut TemplateRegistry<T>> {
    registry
        .as_any_mut()
        .downcast_mut()
        .ok_or_else(|| Error::internal(format!("registry type mismatch for {}", T::TYPE_NAME)))
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<_> = self.registries.iter().map(|r| r.type_name()).collect();
        f.debug_struct("Templates")
            .field("store", &self.store)
            .field("converters", &self.converters)
            .field("types", &types)
            .finish()
    }
}
