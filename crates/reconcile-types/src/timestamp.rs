use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Modification time of a record.
///
/// Timestamps only break ties between two differing versions of the same
/// record. They never take part in content equality, so touching a record
/// without editing it still counts as unchanged.
///
/// Serialized as an RFC 3339 string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap an existing UTC date-time.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// The Unix epoch. Records that never carried a timestamp get this value.
    pub fn epoch() -> Self {
        Self(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Midnight UTC on the given calendar day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, TypeError> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .map(Self)
            .ok_or_else(|| {
                TypeError::InvalidTimestamp(format!("no such date: {year:04}-{month:02}-{day:02}"))
            })
    }

    /// Parse an RFC 3339 string, normalizing the offset to UTC.
    pub fn parse_rfc3339(s: &str) -> Result<Self, TypeError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| TypeError::InvalidTimestamp(format!("{s:?}: {e}")))
    }

    /// The wrapped date-time.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns `true` if this timestamp is strictly later than `other`.
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns `true` if this timestamp is strictly earlier than `other`.
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::epoch()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_rfc3339(s)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0.to_rfc3339())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
