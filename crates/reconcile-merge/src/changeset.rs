use std::collections::HashSet;

use crate::entity::MergeIdentity;

/// The removals and additions produced by a three-way merge.
///
/// Entries borrow from the snapshots the merge was run on: `removed` points
/// into `mine`, `added` points into `theirs`.
#[derive(Debug, PartialEq, Eq)]
pub struct Changeset<'a, E> {
    /// Incoming records to add to `mine`, in emission order.
    pub added: Vec<&'a E>,
    /// Local records to drop from `mine`, in emission order.
    pub removed: Vec<&'a E>,
}

impl<'a, E> Default for Changeset<'a, E> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<'a, E> Changeset<'a, E> {
    /// Create an empty changeset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the merge requires no operations.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Total number of operations.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

impl<'a, E: MergeIdentity + Clone> Changeset<'a, E> {
    /// Apply the changeset to `mine`, producing the merged snapshot.
    ///
    /// Records of `mine` whose identity was removed are dropped, the rest keep
    /// their order, and the additions are appended in emission order.
    pub fn apply(&self, mine: &[E]) -> Vec<E> {
        let dropped: HashSet<&E::Id> = self.removed.iter().map(|e| e.merge_id()).collect();

        let mut merged: Vec<E> = mine
            .iter()
            .filter(|e| !dropped.contains(e.merge_id()))
            .cloned()
            .collect();
        merged.extend(self.added.iter().map(|e| (*e).clone()));
        merged
    }
}
