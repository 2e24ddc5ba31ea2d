//! Configuration management CLI commands.
//!
//! Provides `config path` and `config init`.

use std::path::Path;

use blobhub::config::{config_file_path, ConfigFile};
use clap::Subcommand;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Init { force } => run_init(&config_file_path(), force),
    }
}

/// Write the default configuration to `path`.
fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    ConfigFile::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
