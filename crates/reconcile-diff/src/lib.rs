//! Two-way differ for keyed-collection reconciliation.
//!
//! Compares two snapshots by whole-value equality and reports which elements
//! only one side holds. There is no notion of identity here: an element is
//! either present on a side or it is not.
//!
//! # Key Types
//!
//! - [`Sink`] -- Output destination receiving emitted elements (collection or callback)
//! - [`TwoWayDiff`] -- Collected result of [`two_way`]

pub mod sink;
pub mod two_way;

pub use sink::{from_fn, FromFn, Sink};
pub use two_way::{two_way, two_way_into, TwoWayDiff};
