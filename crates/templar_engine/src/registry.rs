//! Per-namespace template registries.
//!
//! A registry materializes the records of one namespace into one template
//! type, memoizing every chain link so each record is materialized at most
//! once.

use std::collections::HashMap;
use std::sync::Arc;

use templar_foundation::{Error, ErrorContext, Result};
use templar_storage::{NamespaceRecords, RecordStore, StoredRecord, resolve_chain};
use tracing::debug;

use crate::convert::Converters;
use crate::materialize::{Materializer, Resolved};
use crate::schema::Template;

/// Load progress of one namespace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoadState {
    /// Nothing bulk-loaded yet; lookups resolve on demand.
    #[default]
    Unloaded,
    /// Every abstract record is materialized.
    AbstractsLoaded,
    /// Every abstract and concrete record is materialized.
    ConcreteLoaded,
}

/// Materialized templates of one namespace.
///
/// Every lookup takes `&mut self` and builds its chain iteratively, so a
/// resolution can never re-enter the registry; cycles are caught by the
/// chain walk before anything is materialized.
#[derive(Debug)]
pub struct TemplateRegistry<T> {
    abstracts: HashMap<String, Resolved<T>>,
    concrete: HashMap<String, Resolved<T>>,
    state: LoadState,
}

impl<T> Default for TemplateRegistry<T> {
    fn default() -> Self {
        Self {
            abstracts: HashMap::new(),
            concrete: HashMap::new(),
            state: LoadState::Unloaded,
        }
    }
}

impl<T: Template> TemplateRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the namespace this registry loads from.
    #[must_use]
    pub fn namespace(&self) -> &'static str {
        T::NAMESPACE
    }

    /// Returns the load state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Materializes every abstract record. Idempotent.
    ///
    /// Returns the number of abstract templates held afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error.
    pub fn load_abstracts(&mut self, store: &RecordStore, converters: &Converters) -> Result<usize> {
        if self.state >= LoadState::AbstractsLoaded {
            return Ok(self.abstracts.len());
        }
        let records = store.require_namespace(T::NAMESPACE)?;
        for id in records.abstract_ids() {
            if let Some(stored) = records.abstract_record(id) {
                self.build(store, records, stored, converters)?;
            }
        }
        self.state = LoadState::AbstractsLoaded;
        debug!(
            namespace = T::NAMESPACE,
            template_type = T::TYPE_NAME,
            count = self.abstracts.len(),
            "loaded abstract templates"
        );
        Ok(self.abstracts.len())
    }

    /// Materializes every concrete record, loading abstracts first.
    /// Idempotent.
    ///
    /// Returns the number of concrete templates held afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error.
    pub fn load_concrete(&mut self, store: &RecordStore, converters: &Converters) -> Result<usize> {
        if self.state == LoadState::ConcreteLoaded {
            return Ok(self.concrete.len());
        }
        self.load_abstracts(store, converters)?;
        let records = store.require_namespace(T::NAMESPACE)?;
        for id in records.concrete_ids() {
            if let Some(stored) = records.concrete_record(id) {
                self.build(store, records, stored, converters)?;
            }
        }
        self.state = LoadState::ConcreteLoaded;
        debug!(
            namespace = T::NAMESPACE,
            template_type = T::TYPE_NAME,
            count = self.concrete.len(),
            "loaded concrete templates"
        );
        Ok(self.concrete.len())
    }

    /// Resolves a concrete template, materializing it on demand.
    ///
    /// Abstract identifiers are never returned here.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTemplate` if no concrete record has this identifier,
    /// or any resolution error.
    pub fn resolve(&mut self, store: &RecordStore, converters: &Converters, id: &str) -> Result<Arc<T>> {
        if let Some(hit) = self.concrete.get(id) {
            return Ok(Arc::clone(&hit.template));
        }
        let records = store.require_namespace(T::NAMESPACE)?;
        let stored = records
            .concrete_record(id)
            .ok_or_else(|| Error::unknown_template(T::NAMESPACE, id))?;
        Ok(self.build(store, records, stored, converters)?.template)
    }

    /// Resolves an abstract template, materializing it on demand.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTemplate` if no abstract record has this identifier,
    /// or any resolution error.
    pub fn resolve_abstract(
        &mut self,
        store: &RecordStore,
        converters: &Converters,
        id: &str,
    ) -> Result<Arc<T>> {
        if let Some(hit) = self.abstracts.get(id) {
            return Ok(Arc::clone(&hit.template));
        }
        let records = store.require_namespace(T::NAMESPACE)?;
        let stored = records
            .abstract_record(id)
            .ok_or_else(|| Error::unknown_template(T::NAMESPACE, id))?;
        Ok(self.build(store, records, stored, converters)?.template)
    }

    /// Returns an already materialized concrete template.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.concrete.get(id).map(|r| Arc::clone(&r.template))
    }

    /// Returns an already materialized abstract template.
    #[must_use]
    pub fn get_abstract(&self, id: &str) -> Option<Arc<T>> {
        self.abstracts.get(id).map(|r| Arc::clone(&r.template))
    }

    /// Iterates over materialized concrete templates, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<T>)> {
        self.concrete.iter().map(|(id, r)| (id.as_str(), &r.template))
    }

    /// Returns the number of materialized concrete templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.concrete.len()
    }

    /// Returns true if no concrete template is materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concrete.is_empty()
    }

    fn cached(&self, stored: &StoredRecord) -> Option<&Resolved<T>> {
        if stored.is_abstract() {
            self.abstracts.get(stored.id())
        } else {
            self.concrete.get(stored.id())
        }
    }

    /// Materializes a record and every ancestor not yet cached, root first.
    fn build(
        &mut self,
        store: &RecordStore,
        records: &NamespaceRecords,
        stored: &StoredRecord,
        converters: &Converters,
    ) -> Result<Resolved<T>> {
        if let Some(hit) = self.cached(stored) {
            return Ok(hit.clone());
        }

        let chain = resolve_chain(records, stored, store.config().max_chain_depth)
            .map_err(|e| annotate(e, T::NAMESPACE, stored))?;
        let materializer = Materializer::new(converters);

        let mut parent: Option<Resolved<T>> = None;
        for link in chain.iter() {
            if let Some(hit) = self.cached(link) {
                parent = Some(hit.clone());
                continue;
            }

            let resolved = materializer
                .materialize::<T>(link, parent.as_ref(), !link.is_abstract())
                .map_err(|e| annotate(e, T::NAMESPACE, link))?;

            let cache = if link.is_abstract() {
                &mut self.abstracts
            } else {
                &mut self.concrete
            };
            cache.insert(link.id().to_string(), resolved.clone());
            parent = Some(resolved);
        }

        parent.ok_or_else(|| Error::internal("inheritance chain was empty"))
    }
}

/// Adds the namespace, record origin, and a resolution frame to an error,
/// keeping frames added further down.
fn annotate(mut error: Error, namespace: &str, stored: &StoredRecord) -> Error {
    let context = error.context.get_or_insert_with(ErrorContext::new);
    if context.namespace.is_none() {
        context.namespace = Some(namespace.to_string());
    }
    if context.source.is_none() {
        context.source = stored.record.source().map(str::to_string);
    }
    error.with_frame(stored.identity.to_string())
}
