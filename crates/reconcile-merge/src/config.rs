use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do when both sides changed a record to different content and
/// their timestamps are exactly equal.
///
/// The timestamps give no answer in that case, so the outcome is a policy
/// choice. [`TieBreak::KeepMine`] is the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Emit nothing; the local edit stays.
    #[default]
    KeepMine,
    /// Replace the local edit with the incoming one.
    AdoptTheirs,
    /// Fail the whole merge with [`MergeError::TimestampTie`](crate::MergeError::TimestampTie).
    Reject,
}

impl TieBreak {
    /// All policies, in declaration order.
    pub const ALL: [TieBreak; 3] = [Self::KeepMine, Self::AdoptTheirs, Self::Reject];

    /// The kebab-case name used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeepMine => "keep-mine",
            Self::AdoptTheirs => "adopt-theirs",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| {
                format!("unknown tie-break policy {s:?} (expected keep-mine, adopt-theirs, or reject)")
            })
    }
}

/// Configuration for a three-way merge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MergeConfig {
    /// Policy for conflicting edits with equal timestamps.
    pub tie_break: TieBreak,
}

impl MergeConfig {
    /// Configuration with an explicit tie-break policy.
    pub fn with_tie_break(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }
}
