//! Three-way merge engine for keyed collections.
//!
//! Given a common ancestor (`reference`), an incoming snapshot (`theirs`), and
//! the local snapshot (`mine`), computes the removals and additions that move
//! `mine` to the merged state. Records are correlated by merge identity,
//! compared by content equality, and conflicting edits are settled by
//! modification timestamp.
//!
//! # Key Types
//!
//! - [`MergeIdentity`] / [`Timestamped`] -- Capabilities a mergeable entity provides
//! - [`Decision`] / [`Resolution`] -- Outcome of classifying one identity
//! - [`TieBreak`] / [`MergeConfig`] -- Policy for conflicts with equal timestamps
//! - [`MergeReport`] -- Per-decision counts and conflict list of one merge
//! - [`Changeset`] -- Collected removals and additions, applicable to `mine`

pub mod changeset;
pub mod config;
pub mod decision;
pub mod entity;
pub mod error;
pub mod three_way;

pub use changeset::Changeset;
pub use config::{MergeConfig, TieBreak};
pub use decision::{classify, Decision, Resolution};
pub use entity::{MergeIdentity, Timestamped};
pub use error::{MergeError, MergeResult, Side};
pub use reconcile_diff::{from_fn, Sink};
pub use three_way::{
    three_way, three_way_by, three_way_into, three_way_with, ConflictRecord, MergeReport,
};
