//! Command line interface.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Inspect namespace change-notification event logs.
#[derive(Parser)]
#[command(name = "dfs-inotify", version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print JSON Schema for event records.
    Schema,
    /// Print every event, one per line.
    Cat(LogArgs),
    /// Count events per kind and total the closed bytes.
    Summarize(LogArgs),
    /// Report events whose fields break the per-kind rules.
    Check(LogArgs),
    /// Replay the log into a namespace image and print it.
    Replay(LogArgs),
}

#[derive(Args, Clone)]
pub struct LogArgs {
    /// Event log file, or a directory of `.jsonl`/`.ndjson` segments.
    #[arg(long, required = true)]
    pub log: PathBuf,

    /// Output structured JSON to stdout.
    #[arg(long)]
    pub json: bool,

    /// Skip corrupt records instead of stopping at the first one.
    #[arg(long)]
    pub keep_going: bool,
}
