//! Capabilities a mergeable entity provides.
//!
//! Identity and timestamp are separate traits; content equality is the
//! type's own [`PartialEq`]. A type that cannot implement these traits can
//! still be merged through [`three_way_by`](crate::three_way_by) with
//! accessor closures.
//!
//! Content equality must exclude volatile bookkeeping such as the
//! modification timestamp, otherwise touching a record without editing it
//! reads as a change.

use std::fmt::Debug;
use std::hash::Hash;

use reconcile_types::{Record, RecordId, Timestamp};

/// A stable key correlating one logical record across snapshots.
pub trait MergeIdentity {
    /// The key type. Unique within one snapshot.
    type Id: Eq + Hash + Debug + ?Sized;

    /// The record's merge identity.
    fn merge_id(&self) -> &Self::Id;
}

/// A modification time used to settle conflicting edits.
pub trait Timestamped {
    /// The timestamp type; later compares greater.
    type Stamp: Ord + Debug;

    /// When the record was last modified.
    fn timestamp(&self) -> Self::Stamp;
}

impl MergeIdentity for Record {
    type Id = RecordId;

    fn merge_id(&self) -> &RecordId {
        &self.id
    }
}

impl Timestamped for Record {
    type Stamp = Timestamp;

    fn timestamp(&self) -> Timestamp {
        self.modified
    }
}
