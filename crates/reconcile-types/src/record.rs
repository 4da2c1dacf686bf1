use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record_id::RecordId;
use crate::timestamp::Timestamp;

/// A keyed record with arbitrary JSON content.
///
/// This is the entity the command-line collaborator loads from snapshot
/// files. Equality compares `id` and `data` only; `modified` is bookkeeping
/// and is deliberately excluded. Hashing covers `id` alone, which keeps
/// `a == b` implying `hash(a) == hash(b)` even though `Value` is not `Hash`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Record {
    /// Merge identity.
    pub id: RecordId,
    /// Record content. `null` when the snapshot omits it.
    #[serde(default)]
    pub data: Value,
    /// Last modification time. The Unix epoch when the snapshot omits it.
    #[serde(default)]
    pub modified: Timestamp,
}

impl Record {
    /// Create a record with the given content, stamped at the epoch.
    pub fn new(id: RecordId, data: Value) -> Self {
        Self {
            id,
            data,
            modified: Timestamp::epoch(),
        }
    }

    /// Builder-style override of the modification time.
    pub fn modified_at(mut self, modified: Timestamp) -> Self {
        self.modified = modified;
        self
    }

    /// Returns `true` if both records carry the same content, ignoring identity.
    pub fn same_content(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.data == other.data
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) @ {}", self.id, self.data, self.modified)
    }
}
