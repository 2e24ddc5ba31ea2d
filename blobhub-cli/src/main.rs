//! BlobHub CLI - Command-line interface
//!
//! Runs the blob tracking hub with a live terminal view, or headless with
//! periodic status lines, and manages the configuration file.

mod commands;
mod error;
mod tui_app;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::run::RunArgs;

#[derive(Debug, Parser)]
#[command(name = "blobhub", version = blobhub::VERSION, about = "Multi-sensor blob tracking hub")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the detection sources and the tracking view
    Run {
        /// Configuration file (defaults to ~/.blobhub/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of simulated detection sources
        #[arg(long)]
        sources: Option<usize>,

        /// Print status lines instead of drawing the terminal view
        #[arg(long)]
        headless: bool,

        /// Stop after this many seconds
        #[arg(long, value_name = "SECS")]
        duration: Option<u64>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            sources,
            headless,
            duration,
        } => commands::run::run(RunArgs {
            config,
            sources,
            headless,
            duration,
        }),
        Commands::Config { command } => commands::config::run(command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
