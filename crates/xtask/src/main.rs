//! Development tasks for delve
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{CheckContent, GenDungeon, ReadProfile, Simulate};
use tracing_subscriber::EnvFilter;

/// Development tasks for delve
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for delve", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate a dungeon from a seed and print it
    GenDungeon(GenDungeon),

    /// Play a run headlessly and report the outcome
    Simulate(Simulate),

    /// Load and validate a data directory
    CheckContent(CheckContent),

    /// Inspect a saved meta-progression profile
    ReadProfile(ReadProfile),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::GenDungeon(cmd) => cmd.execute(),
        Command::Simulate(cmd) => cmd.execute(),
        Command::CheckContent(cmd) => cmd.execute(),
        Command::ReadProfile(cmd) => cmd.execute(),
    }
}
