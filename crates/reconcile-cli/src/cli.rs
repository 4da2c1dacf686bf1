use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use reconcile_merge::TieBreak;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(
    name = "reconcile",
    about = "Reconcile keyed JSON snapshots: two-way diff and three-way merge",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format; overrides the config file
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show records only one of two snapshots holds
    Diff(DiffArgs),
    /// Merge incoming changes into the local snapshot
    Merge(MergeArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub theirs: PathBuf,
    pub mine: PathBuf,
}

#[derive(Args)]
pub struct MergeArgs {
    /// Common ancestor snapshot; empty when omitted
    #[arg(long)]
    pub reference: Option<PathBuf>,
    #[arg(long)]
    pub theirs: PathBuf,
    #[arg(long)]
    pub mine: PathBuf,
    /// Policy for conflicting edits with equal timestamps
    #[arg(long)]
    pub tie_break: Option<TieBreak>,
    /// Write the merged snapshot to this file
    #[arg(long)]
    pub apply: Option<PathBuf>,
}
