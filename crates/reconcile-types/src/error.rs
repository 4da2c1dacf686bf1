use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid record id {id:?}: {reason}")]
    InvalidRecordId { id: String, reason: String },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
