//! ghlog — GitHub activity log and branch-mirror CI pipeline CLI.
//!
//! # Usage
//!
//! ```text
//! ghlog log --user <name> [--date YYYY-MM-DD] [--token <tok>] [--json]
//! ghlog ci init <repo-url> --remote <mirror-url> [--name <n>] [--workdir <path>]
//! ghlog ci run <name> [--branch <b>] [--no-wait] [--json]
//! ghlog ci list
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ci::CiCommand, log::LogArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ghlog",
    version,
    about = "Fetch a user's daily GitHub activity and mirror branches through a three-stage pipeline",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one local calendar day of a user's GitHub activity.
    Log(LogArgs),

    /// Run and manage checkout → lint → sync mirror pipelines.
    Ci {
        #[command(subcommand)]
        command: CiCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Log(args) => args.run(),
        Commands::Ci { command } => commands::ci::run(command),
    }
}
