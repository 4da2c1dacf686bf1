//! Two-way diff: value-equality set difference between two snapshots.
//!
//! `added` is everything `theirs` holds that `mine` does not, `removed` is
//! everything `mine` holds that `theirs` does not. Each side is indexed in a
//! [`HashSet`] so the diff runs in `O(|theirs| + |mine|)`.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::trace;

use crate::sink::Sink;

/// The collected result of comparing two snapshots.
#[derive(Debug, PartialEq, Eq)]
pub struct TwoWayDiff<'a, T> {
    /// Elements of `theirs` missing from `mine`, in `theirs` order.
    pub added: Vec<&'a T>,
    /// Elements of `mine` missing from `theirs`, in `mine` order.
    pub removed: Vec<&'a T>,
}

impl<'a, T> TwoWayDiff<'a, T> {
    /// Returns `true` if both snapshots hold the same elements.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Total number of reported elements.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

impl<'a, T> Default for TwoWayDiff<'a, T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

/// Compare two snapshots and collect the differences.
///
/// ```
/// use reconcile_diff::two_way;
///
/// let diff = two_way(&[16, 8, 4], &[1, 2, 4]);
/// assert_eq!(diff.added, vec![&16, &8]);
/// assert_eq!(diff.removed, vec![&1, &2]);
/// ```
pub fn two_way<'a, T: Eq + Hash>(theirs: &'a [T], mine: &'a [T]) -> TwoWayDiff<'a, T> {
    let mut diff = TwoWayDiff::default();
    two_way_into(theirs, mine, &mut diff.added, &mut diff.removed);
    diff
}

/// Compare two snapshots, reporting differences through sinks.
///
/// Every occurrence in `theirs` with no equal element in `mine` goes to
/// `added`; every occurrence in `mine` with no equal element in `theirs` goes
/// to `removed`. Duplicates are reported once per occurrence.
pub fn two_way_into<'a, T, A, R>(theirs: &'a [T], mine: &'a [T], mut added: A, mut removed: R)
where
    T: Eq + Hash,
    A: Sink<&'a T>,
    R: Sink<&'a T>,
{
    let theirs_index: HashSet<&T> = theirs.iter().collect();
    let mine_index: HashSet<&T> = mine.iter().collect();

    let mut added_count = 0usize;
    for element in theirs {
        if !mine_index.contains(element) {
            added.accept(element);
            added_count += 1;
        }
    }

    let mut removed_count = 0usize;
    for element in mine {
        if !theirs_index.contains(element) {
            removed.accept(element);
            removed_count += 1;
        }
    }

    trace!(
        theirs = theirs.len(),
        mine = mine.len(),
        added = added_count,
        removed = removed_count,
        "two-way diff complete"
    );
}
