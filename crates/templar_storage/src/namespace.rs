//! Namespace definitions: which type tags belong together and how their
//! records are identified.

use std::collections::HashMap;

use templar_foundation::{Error, ErrorKind, Result};

/// Fallback rule used when a record has neither `id` nor `abstract`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IdRule {
    /// No fallback; `id` or `abstract` is mandatory.
    #[default]
    Explicit,
    /// `result`, suffixed with `_` and `id_suffix` when that is non-empty.
    ResultWithSuffix,
    /// Normalized `category` and `description`.
    CategoryDescription,
}

/// One identifier space and the type tags that feed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceConfig {
    /// Namespace name (e.g., `item`, `recipe`).
    pub name: String,
    /// Type tags whose records belong here.
    pub type_tags: Vec<String>,
    /// Identifier fallback rule.
    pub id_rule: IdRule,
}

impl NamespaceConfig {
    /// Creates a namespace with no type tags and explicit identifiers.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tags: Vec::new(),
            id_rule: IdRule::Explicit,
        }
    }

    /// Adds a type tag.
    #[must_use]
    pub fn with_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_tags.push(tag.into());
        self
    }

    /// Adds several type tags.
    #[must_use]
    pub fn with_type_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Sets the identifier fallback rule.
    #[must_use]
    pub fn with_id_rule(mut self, rule: IdRule) -> Self {
        self.id_rule = rule;
        self
    }
}

/// Static table mapping type tags to namespaces.
#[derive(Clone, Debug, Default)]
pub struct NamespaceTable {
    namespaces: Vec<NamespaceConfig>,
    by_tag: HashMap<String, usize>,
}

impl NamespaceTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace name is already registered, or if
    /// one of its type tags is already claimed by another namespace.
    pub fn register(&mut self, config: NamespaceConfig) -> Result<()> {
        if self.get(&config.name).is_some() {
            return Err(Error::internal(format!(
                "namespace '{}' registered twice",
                config.name
            )));
        }
        if let Some(tag) = config.type_tags.iter().find(|t| self.by_tag.contains_key(*t)) {
            return Err(Error::internal(format!(
                "type tag '{tag}' already belongs to namespace '{}'",
                self.namespaces[self.by_tag[tag]].name
            )));
        }

        let index = self.namespaces.len();
        for tag in &config.type_tags {
            self.by_tag.insert(tag.clone(), index);
        }
        self.namespaces.push(config);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn with_namespace(mut self, config: NamespaceConfig) -> Result<Self> {
        self.register(config)?;
        Ok(self)
    }

    /// Looks up a namespace by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamespaceConfig> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    /// Looks up the namespace that owns a type tag.
    #[must_use]
    pub fn for_type_tag(&self, tag: &str) -> Option<&NamespaceConfig> {
        self.by_tag.get(tag).map(|&i| &self.namespaces[i])
    }

    /// Resolves a type tag, failing if no namespace owns it.
    ///
    /// # Errors
    ///
    /// Returns an unknown type tag error.
    pub fn require_type_tag(&self, tag: &str) -> Result<&NamespaceConfig> {
        self.for_type_tag(tag)
            .ok_or_else(|| Error::new(ErrorKind::UnknownTypeTag(tag.to_string())))
    }

    /// Iterates over namespaces in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &NamespaceConfig> {
        self.namespaces.iter()
    }

    /// Returns the number of namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Returns true if no namespaces are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
