//! Battle resolution command-line tool.
//!
//! Loads a content directory, resolves one encounter for a seed and prints the
//! action log. Run with: `battle-cli <command>`

mod commands;
mod config;
mod logging;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{ReplayCheck, Run};

/// Deterministic encounter resolver
#[derive(Parser)]
#[command(name = "battle-cli")]
#[command(about = "Resolve and inspect deterministic battles", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Resolve one encounter and print its log
    Run(Run),

    /// Resolve an encounter repeatedly and compare log roots
    ReplayCheck(ReplayCheck),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for BATTLE_DATA_DIR and BATTLE_SEED)
    let _ = dotenvy::dotenv();

    logging::setup_logging();

    let cli = Cli::parse();
    let config = config::CliConfig::from_env();

    match cli.command {
        Command::Run(cmd) => cmd.execute(&config),
        Command::ReplayCheck(cmd) => cmd.execute(&config),
    }
}
