//! Error types for the merge crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which input snapshot an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Reference,
    Theirs,
    Mine,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reference => "reference",
            Self::Theirs => "theirs",
            Self::Mine => "mine",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during a three-way merge.
///
/// Every error is raised before any sink is invoked, so a failed merge never
/// leaves partial output behind.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MergeError {
    /// The same merge identity occurs more than once within one snapshot.
    #[error("duplicate merge identity {id} in {side} snapshot")]
    DuplicateIdentity { side: Side, id: String },

    /// Both sides changed a record to different content at the same instant
    /// and the configured tie-break refuses to pick a winner.
    #[error("conflicting edits to {id} carry identical timestamps")]
    TimestampTie { id: String },
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
