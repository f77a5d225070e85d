//! Indexed storage of every ingested record.
//!
//! Records are filed by namespace (through their `type` tag) and indexed by
//! identifier once, at ingest time, so ancestor lookups during chain walks
//! are hash lookups rather than scans.

use std::collections::HashMap;

use indexmap::IndexMap;
use templar_foundation::record::COPY_FROM_KEY;
use templar_foundation::{Error, ErrorContext, ErrorKind, Record, Result, Value};
use tracing::{debug, warn};

use crate::config::{DuplicatePolicy, LoaderConfig, UnknownTypePolicy};
use crate::identity::{Identity, resolve_identity};
use crate::namespace::{NamespaceConfig, NamespaceTable};

/// A record together with its resolved identity and parent reference.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredRecord {
    /// The raw record.
    pub record: Record,
    /// Identity within the namespace.
    pub identity: Identity,
    /// The `copy-from` target, if any.
    pub copy_from: Option<String>,
}

impl StoredRecord {
    /// Resolves identity and parent reference for a record.
    ///
    /// # Errors
    ///
    /// Returns a malformed record error if the identity cannot be resolved
    /// or `copy-from` is not a string.
    pub fn new(record: Record, namespace: &NamespaceConfig) -> Result<Self> {
        let identity = resolve_identity(&record, namespace)?;
        let copy_from = match record.get(COPY_FROM_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(parent)) => Some(parent.to_string()),
            Some(other) => {
                return Err(Error::malformed(
                    &namespace.name,
                    format!(
                        "{identity} has a '{COPY_FROM_KEY}' of type {}, expected string",
                        other.kind_name()
                    ),
                ));
            }
        };
        Ok(Self {
            record,
            identity,
            copy_from,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.identity.id
    }

    /// Returns true if this record is abstract.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.identity.is_abstract
    }

    /// Returns the parent identifier, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.copy_from.as_deref()
    }
}

/// All records of one namespace, indexed by abstract and concrete identifier.
#[derive(Clone, Debug)]
pub struct NamespaceRecords {
    config: NamespaceConfig,
    records: Vec<StoredRecord>,
    abstracts: IndexMap<String, usize>,
    concrete: IndexMap<String, usize>,
}

impl NamespaceRecords {
    fn new(config: NamespaceConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            abstracts: IndexMap::new(),
            concrete: IndexMap::new(),
        }
    }

    /// Returns the namespace name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the namespace configuration.
    #[must_use]
    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// Looks up an abstract record.
    #[must_use]
    pub fn abstract_record(&self, id: &str) -> Option<&StoredRecord> {
        self.abstracts.get(id).map(|&i| &self.records[i])
    }

    /// Looks up a concrete record.
    #[must_use]
    pub fn concrete_record(&self, id: &str) -> Option<&StoredRecord> {
        self.concrete.get(id).map(|&i| &self.records[i])
    }

    /// Looks up a `copy-from` target: abstracts first, then concrete records.
    #[must_use]
    pub fn parent_record(&self, id: &str) -> Option<&StoredRecord> {
        self.abstract_record(id).or_else(|| self.concrete_record(id))
    }

    /// Abstract identifiers in ingest order.
    pub fn abstract_ids(&self) -> impl Iterator<Item = &str> {
        self.abstracts.keys().map(String::as_str)
    }

    /// Concrete identifiers in ingest order.
    pub fn concrete_ids(&self) -> impl Iterator<Item = &str> {
        self.concrete.keys().map(String::as_str)
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.abstracts.len() + self.concrete.len()
    }

    /// Returns true if no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Files a record under its identity, honoring the duplicate policy.
    ///
    /// Returns `true` if the record was stored.
    fn insert(&mut self, stored: StoredRecord, policy: DuplicatePolicy) -> Result<bool> {
        let index = if stored.is_abstract() {
            &mut self.abstracts
        } else {
            &mut self.concrete
        };

        if let Some(&existing) = index.get(stored.id()) {
            return match policy {
                DuplicatePolicy::Reject => Err(Error::new(ErrorKind::DuplicateIdentifier {
                    namespace: self.config.name.clone(),
                    id: stored.id().to_string(),
                })),
                DuplicatePolicy::KeepFirst => {
                    warn!(
                        namespace = %self.config.name,
                        identity = %stored.identity,
                        "duplicate identifier ignored; keeping first definition"
                    );
                    Ok(false)
                }
                DuplicatePolicy::KeepLast => {
                    warn!(
                        namespace = %self.config.name,
                        identity = %stored.identity,
                        "duplicate identifier replaces earlier definition"
                    );
                    self.records[existing] = stored;
                    Ok(true)
                }
            };
        }

        index.insert(stored.id().to_string(), self.records.len());
        self.records.push(stored);
        Ok(true)
    }
}

/// Holds every raw record, keyed by namespace and identifier.
///
/// Mutated only during the load phase; read-only afterwards.
#[derive(Clone, Debug)]
pub struct RecordStore {
    config: LoaderConfig,
    table: NamespaceTable,
    namespaces: HashMap<String, NamespaceRecords>,
    skipped: usize,
}

impl RecordStore {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new(table: NamespaceTable) -> Self {
        Self::with_config(table, LoaderConfig::default())
    }

    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn with_config(table: NamespaceTable, config: LoaderConfig) -> Self {
        let namespaces = table
            .iter()
            .map(|ns| (ns.name.clone(), NamespaceRecords::new(ns.clone())))
            .collect();
        Self {
            config,
            table,
            namespaces,
            skipped: 0,
        }
    }

    /// Returns the loader configuration.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Returns the namespace table.
    #[must_use]
    pub fn table(&self) -> &NamespaceTable {
        &self.table
    }

    /// Files a record under the namespace selected by its `type` tag.
    ///
    /// Returns `true` if the record was stored, `false` if it was skipped
    /// (unknown type tag under [`UnknownTypePolicy::Skip`], or a duplicate
    /// under [`DuplicatePolicy::KeepFirst`]).
    ///
    /// # Errors
    ///
    /// Returns an error for malformed identities, rejected duplicates, and
    /// rejected type tags.
    pub fn insert(&mut self, record: Record) -> Result<bool> {
        let tag = record.type_tag().map(str::to_string);
        let namespace = tag
            .as_deref()
            .and_then(|t| self.table.for_type_tag(t))
            .map(|ns| ns.name.clone());

        match namespace {
            Some(namespace) => self.insert_into(&namespace, record),
            None => {
                let tag = tag.unwrap_or_else(|| "<missing>".to_string());
                match self.config.unknown_type_policy {
                    UnknownTypePolicy::Skip => {
                        warn!(type_tag = %tag, source = ?record.source(), "skipping record with unknown type tag");
                        self.skipped += 1;
                        Ok(false)
                    }
                    UnknownTypePolicy::Reject => {
                        let mut context = ErrorContext::new();
                        if let Some(source) = record.source() {
                            context = context.with_source(source);
                        }
                        Err(Error::new(ErrorKind::UnknownTypeTag(tag)).with_context(context))
                    }
                }
            }
        }
    }

    /// Files a record directly under a namespace, ignoring its `type` tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is unknown, the identity is
    /// malformed, or the duplicate policy rejects the record.
    pub fn insert_into(&mut self, namespace: &str, record: Record) -> Result<bool> {
        let policy = self.config.duplicate_policy;
        let records = self
            .namespaces
            .get_mut(namespace)
            .ok_or_else(|| Error::unknown_namespace(namespace))?;

        let mut context = ErrorContext::new().with_namespace(namespace);
        if let Some(source) = record.source() {
            context = context.with_source(source);
        }

        let stored = StoredRecord::new(record, &records.config)
            .map_err(|e| e.with_context(context.clone()))?;
        records
            .insert(stored, policy)
            .map_err(|e| e.with_context(context))
    }

    /// Files every record from an iterator.
    ///
    /// Returns the number of records stored.
    ///
    /// # Errors
    ///
    /// Stops at the first record that fails to file.
    pub fn ingest<I: IntoIterator<Item = Record>>(&mut self, records: I) -> Result<usize> {
        let mut stored = 0;
        for record in records {
            if self.insert(record)? {
                stored += 1;
            }
        }
        Ok(stored)
    }

    /// Parses JSON text (one object or an array) and files every record.
    ///
    /// # Errors
    ///
    /// Returns a parse error for invalid JSON, or the first filing error.
    pub fn ingest_json(&mut self, text: &str, source: Option<&str>) -> Result<usize> {
        let records = Record::parse_many(text)?;
        let count = records.len();
        let stored = self.ingest(records.into_iter().map(|r| match source {
            Some(source) => r.with_source(source),
            None => r,
        }))?;
        debug!(source = ?source, parsed = count, stored, "ingested records");
        Ok(stored)
    }

    /// Returns a namespace's records.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&NamespaceRecords> {
        self.namespaces.get(name)
    }

    /// Returns a namespace's records, failing if it is not configured.
    ///
    /// # Errors
    ///
    /// Returns an unknown namespace error.
    pub fn require_namespace(&self, name: &str) -> Result<&NamespaceRecords> {
        self.namespace(name)
            .ok_or_else(|| Error::unknown_namespace(name))
    }

    /// Returns the total number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.values().map(NamespaceRecords::len).sum()
    }

    /// Returns true if no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of records skipped for unknown type tags.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
