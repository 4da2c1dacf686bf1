//! Per-identity classification: the three-way decision table.
//!
//! For one merge identity, `R`, `T` and `M` are the (possibly absent)
//! versions from reference, theirs and mine. A side "changed" when its
//! version differs from `R`, where presence against absence counts as a
//! difference.
//!
//! | theirs changed | mine changed | `T == M` | decision |
//! |---|---|---|---|
//! | no  | no  | -   | [`Decision::Unchanged`] |
//! | yes | no  | -   | [`Decision::AdoptTheirs`] |
//! | no  | yes | -   | [`Decision::KeepMine`] |
//! | yes | yes | yes | [`Decision::Converged`] |
//! | yes | yes | no  | [`Decision::Conflict`] |
//!
//! A conflict between two present versions goes to the strictly later
//! timestamp; equal timestamps follow the [`TieBreak`] policy. A conflict
//! where one side deleted the record and the other edited it keeps the edit.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::TieBreak;

/// How a conflict between two changed versions was settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    /// Theirs carries the later timestamp.
    TheirsNewer,
    /// Mine carries the later timestamp.
    MineNewer,
    /// Equal timestamps, [`TieBreak::KeepMine`].
    TieKeptMine,
    /// Equal timestamps, [`TieBreak::AdoptTheirs`].
    TieAdoptedTheirs,
    /// Equal timestamps, [`TieBreak::Reject`]. The merge fails.
    TieRejected,
    /// Mine deleted the record, theirs edited it; the edit is restored.
    TheirsEditOverDelete,
    /// Theirs deleted the record, mine edited it; the edit stays.
    MineEditOverDelete,
}

impl Resolution {
    /// Returns `true` if the incoming version replaces the local one.
    pub fn adopts_theirs(&self) -> bool {
        matches!(
            self,
            Self::TheirsNewer | Self::TieAdoptedTheirs | Self::TheirsEditOverDelete
        )
    }

    /// Returns `true` if the timestamps were equal.
    pub fn is_tie(&self) -> bool {
        matches!(
            self,
            Self::TieKeptMine | Self::TieAdoptedTheirs | Self::TieRejected
        )
    }
}

/// Outcome of classifying one merge identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    /// Neither side changed the record.
    Unchanged,
    /// Only theirs changed it; mine takes the incoming version.
    AdoptTheirs,
    /// Only mine changed it (including local adds and deletes); kept as is.
    KeepMine,
    /// Both changed it to the same content.
    Converged,
    /// Both changed it to different content.
    Conflict(Resolution),
}

impl Decision {
    /// Returns `true` if mine must take the incoming version: remove the
    /// local record if present, then add the incoming one if present.
    pub fn adopts_theirs(&self) -> bool {
        match self {
            Self::AdoptTheirs => true,
            Self::Conflict(resolution) => resolution.adopts_theirs(),
            Self::Unchanged | Self::KeepMine | Self::Converged => false,
        }
    }

    /// Returns `true` for the conflict row.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Classify one merge identity.
///
/// `stamp` extracts the modification timestamp; it is consulted only when
/// both sides hold differing, changed versions.
pub fn classify<E, S, F>(
    reference: Option<&E>,
    theirs: Option<&E>,
    mine: Option<&E>,
    stamp: F,
    tie_break: TieBreak,
) -> Decision
where
    E: PartialEq + ?Sized,
    S: Ord,
    F: Fn(&E) -> S,
{
    let theirs_changed = theirs != reference;
    let mine_changed = mine != reference;

    match (theirs_changed, mine_changed) {
        (false, false) => Decision::Unchanged,
        (true, false) => Decision::AdoptTheirs,
        (false, true) => Decision::KeepMine,
        (true, true) if theirs == mine => Decision::Converged,
        (true, true) => Decision::Conflict(resolve(theirs, mine, stamp, tie_break)),
    }
}

fn resolve<E, S, F>(theirs: Option<&E>, mine: Option<&E>, stamp: F, tie_break: TieBreak) -> Resolution
where
    E: ?Sized,
    S: Ord,
    F: Fn(&E) -> S,
{
    match (theirs, mine) {
        (Some(t), Some(m)) => match stamp(t).cmp(&stamp(m)) {
            Ordering::Greater => Resolution::TheirsNewer,
            Ordering::Less => Resolution::MineNewer,
            Ordering::Equal => match tie_break {
                TieBreak::KeepMine => Resolution::TieKeptMine,
                TieBreak::AdoptTheirs => Resolution::TieAdoptedTheirs,
                TieBreak::Reject => Resolution::TieRejected,
            },
        },
        (Some(_), None) => Resolution::TheirsEditOverDelete,
        (None, Some(_)) => Resolution::MineEditOverDelete,
        (None, None) => unreachable!("two absent versions always compare equal"),
    }
}
