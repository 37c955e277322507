//! Development tasks for the Pathfinder 2E rulesets
//!
//! This binary provides content tooling using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{Diff, Dump, Lint, Register};

/// Development tasks for the Pathfinder 2E rulesets
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Content tools for the Pathfinder 2E rulesets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Build both catalogs and report every problem found
    Lint(Lint),

    /// Print catalog entries
    Dump(Dump),

    /// Compare a legacy entry with its Remaster counterpart
    Diff(Diff),

    /// Register a whole catalog and summarize the result
    Register(Register),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for RULES_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Lint(cmd) => cmd.execute(),
        Command::Dump(cmd) => cmd.execute(),
        Command::Diff(cmd) => cmd.execute(),
        Command::Register(cmd) => cmd.execute(),
    }
}
