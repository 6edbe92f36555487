//! `dfs-inotify` - inspect namespace change-notification event logs.

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use dfs_inotify::cli::{Cli, Command};
use dfs_inotify::exit_codes::exit;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let exit_code = match cli.command {
        Command::Schema => {
            let schema = dfs_inotify::model::generate_schema();
            println!("{}", schema);
            exit::SUCCESS
        }
        Command::Cat(args) => dfs_inotify::engine::cat(args)?,
        Command::Summarize(args) => dfs_inotify::engine::summarize(args)?,
        Command::Check(args) => dfs_inotify::engine::check(args)?,
        Command::Replay(args) => dfs_inotify::engine::replay(args)?,
    };
    std::process::exit(exit_code);
}
