//! Configuration for the load phase.

/// What to do when two records claim the same identifier in one namespace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Fail the load with a duplicate identifier error.
    #[default]
    Reject,
    /// Keep the first record and log a warning.
    KeepFirst,
    /// Replace with the later record and log a warning.
    KeepLast,
}

/// What to do with a record whose `type` tag maps to no namespace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnknownTypePolicy {
    /// Skip the record and log a warning.
    #[default]
    Skip,
    /// Fail the load with an unknown type tag error.
    Reject,
}

/// Configuration for record ingestion and chain resolution.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Duplicate identifier handling.
    pub duplicate_policy: DuplicatePolicy,

    /// Unknown type tag handling.
    pub unknown_type_policy: UnknownTypePolicy,

    /// Maximum number of ancestors a single chain may have.
    pub max_chain_depth: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            unknown_type_policy: UnknownTypePolicy::Skip,
            max_chain_depth: 64,
        }
    }
}

impl LoaderConfig {
    /// Creates a lenient configuration for hand-edited data sets.
    ///
    /// Later duplicates win, and unknown type tags are skipped.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::KeepLast,
            ..Self::default()
        }
    }

    /// Creates a strict configuration that rejects anything suspicious.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            unknown_type_policy: UnknownTypePolicy::Reject,
            ..Self::default()
        }
    }

    /// Builder method to set the duplicate policy.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Builder method to set the unknown type policy.
    #[must_use]
    pub fn with_unknown_type_policy(mut self, policy: UnknownTypePolicy) -> Self {
        self.unknown_type_policy = policy;
        self
    }

    /// Builder method to set the maximum chain depth.
    #[must_use]
    pub fn with_max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth;
        self
    }
}
