//! Foundation types for keyed-collection reconciliation.
//!
//! This crate provides the identity, temporal, and record types that the
//! differ, the merger, and the command-line collaborator share.
//!
//! # Key Types
//!
//! - [`RecordId`] -- Stable merge identity correlating one logical record across snapshots
//! - [`Timestamp`] -- UTC modification time used to break conflicting edits
//! - [`Record`] -- Generic keyed record carrying arbitrary JSON content

pub mod error;
pub mod record;
pub mod record_id;
pub mod timestamp;

pub use error::TypeError;
pub use record::Record;
pub use record_id::RecordId;
pub use timestamp::Timestamp;
