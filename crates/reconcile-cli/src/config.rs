use std::fs;
use std::path::Path;

use anyhow::Context;
use reconcile_merge::MergeConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::OutputFormat;

/// Settings read from the optional TOML file passed with `--config`.
///
/// ```toml
/// output = "json"
///
/// [merge]
/// tie-break = "reject"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CliConfig {
    pub merge: MergeConfig,
    pub output: OutputFormat,
}

impl CliConfig {
    /// Load from `path`, or fall back to defaults when no file was given.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), tie_break = %config.merge.tie_break, "loaded config");
        Ok(config)
    }
}
