//! JSON snapshot files.
//!
//! A snapshot is a JSON array of records:
//!
//! ```json
//! [
//!   { "id": "feed-1", "data": { "url": "https://example.org/feed" }, "modified": "2024-03-01T12:00:00Z" }
//! ]
//! ```
//!
//! `data` defaults to `null` and `modified` to the Unix epoch.

use std::fs;
use std::path::Path;

use anyhow::Context;
use reconcile_types::Record;
use tracing::debug;

/// Read a snapshot file.
pub fn load(path: &Path) -> anyhow::Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let records: Vec<Record> = serde_json::from_str(&text)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    debug!(path = %path.display(), records = records.len(), "loaded snapshot");
    Ok(records)
}

/// Read a snapshot file, or return an empty snapshot when no path is given.
pub fn load_or_empty(path: Option<&Path>) -> anyhow::Result<Vec<Record>> {
    match path {
        Some(path) => load(path),
        None => Ok(Vec::new()),
    }
}

/// Write a snapshot file, replacing any existing content.
pub fn save(path: &Path, records: &[Record]) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(records).context("serializing snapshot")?;
    fs::write(path, text).with_context(|| format!("writing snapshot {}", path.display()))?;
    debug!(path = %path.display(), records = records.len(), "wrote snapshot");
    Ok(())
}
