use std::path::PathBuf;

use clap::{Args, Subcommand};
use lin_core::entities::AssociationChainEntry;

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Feed a JSONL file of mutation events through the tracker.
    Replay(ReplayArgs),
    /// Show history for an association-chain scope and everything beneath it.
    History(HistoryArgs),
    /// Validate configuration and print the resolved tracking policy.
    CheckConfig,
    /// Print JSON Schemas for persisted types.
    Schema(SchemaArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Path to a JSONL file, one mutation event per line.
    pub events: PathBuf,

    /// Keep records in memory and print them instead of writing the trail.
    #[arg(long)]
    pub dry_run: bool,

    /// Log and skip events that fail instead of stopping.
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Debug, Clone, Args)]
pub struct HistoryArgs {
    /// Chain prefix, root first, as `Name=ID` pairs.
    #[arg(long, required = true, num_args = 1..)]
    pub scope: Vec<AssociationChainEntry>,
}

#[derive(Debug, Clone, Args)]
pub struct SchemaArgs {
    /// Schema name (omit to list available schemas).
    pub name: Option<String>,
}
