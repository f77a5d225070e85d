//! Root-first ancestor chains built from `copy-from` references.

use std::collections::HashSet;

use templar_foundation::{Error, ErrorKind, Result};

use crate::store::{NamespaceRecords, StoredRecord};

/// An ordered ancestor chain, root first and the requested record last.
#[derive(Clone, Debug)]
pub struct InheritanceChain<'a> {
    links: Vec<&'a StoredRecord>,
}

impl<'a> InheritanceChain<'a> {
    /// Returns the root ancestor (the record with no `copy-from`).
    #[must_use]
    pub fn root(&self) -> &'a StoredRecord {
        self.links[0]
    }

    /// Returns the record the chain was resolved for.
    #[must_use]
    pub fn leaf(&self) -> &'a StoredRecord {
        self.links[self.links.len() - 1]
    }

    /// Returns the leaf's immediate parent, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&'a StoredRecord> {
        self.links.len().checked_sub(2).map(|i| self.links[i])
    }

    /// Iterates root first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a StoredRecord> + '_ {
        self.links.iter().copied()
    }

    /// Returns the number of records in the chain, including the leaf.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Always false; a chain contains at least its leaf.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Identifiers in root-first order.
    #[must_use]
    pub fn ids(&self) -> Vec<&'a str> {
        self.links.iter().map(|r| r.id()).collect()
    }
}

/// Walks `copy-from` references from `start` up to the root.
///
/// Parents resolve against abstract records first, then concrete ones. The
/// walk is iterative and keeps a visited set keyed by identity, so a cycle is
/// reported with the path that closes it instead of overflowing the stack.
///
/// # Errors
///
/// Returns a dangling reference error for an unknown parent, a cyclic
/// inheritance error carrying the offending path, or a chain-too-deep error
/// once more than `max_depth` ancestors have been collected.
pub fn resolve_chain<'a>(
    records: &'a NamespaceRecords,
    start: &'a StoredRecord,
    max_depth: usize,
) -> Result<InheritanceChain<'a>> {
    let mut links = vec![start];
    let mut visited: HashSet<(bool, &str)> = HashSet::new();
    visited.insert((start.is_abstract(), start.id()));

    let mut current = start;
    while let Some(parent_id) = current.parent() {
        let parent = records
            .parent_record(parent_id)
            .ok_or_else(|| Error::dangling_reference(records.name(), current.id(), parent_id))?;

        if !visited.insert((parent.is_abstract(), parent.id())) {
            let mut path: Vec<String> = links.iter().map(|r| r.id().to_string()).collect();
            path.push(parent.id().to_string());
            return Err(Error::cyclic_inheritance(records.name(), path));
        }

        if links.len() > max_depth {
            return Err(Error::new(ErrorKind::ChainTooDeep {
                namespace: records.name().to_string(),
                id: start.id().to_string(),
                limit: max_depth,
            }));
        }

        links.push(parent);
        current = parent;
    }

    links.reverse();
    Ok(InheritanceChain { links })
}
