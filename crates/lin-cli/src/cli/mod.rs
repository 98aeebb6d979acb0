use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `lineage` binary.
#[derive(Debug, Parser)]
#[command(name = "lineage", version, about = "Lineage - entity change history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Explicit config file, layered above `.lineage/config.toml`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the JSONL trail
    #[arg(long, global = true, default_value = ".lineage/trail")]
    pub trail_dir: PathBuf,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
            trail_dir: self.trail_dir.clone(),
        }
    }
}
