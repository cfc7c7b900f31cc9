//! Configuration CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`
//! for viewing and changing the settings the other commands run with.

use clap::Subcommand;
use fertisoil::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., soil.timeout)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., soil.timeout)
        key: String,

        /// Value to set; an empty string clears optional settings
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config: &ConfigFile) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key, config),
        ConfigCommands::Set { key, value } => run_set(&key, &value, config),
        ConfigCommands::List => run_list(config),
        ConfigCommands::Path => run_path(),
    }
}

/// Get a configuration value.
fn run_get(key: &str, config: &ConfigFile) -> Result<(), CliError> {
    let value = config.get(key)?;

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value and write the file.
fn run_set(key: &str, value: &str, config: &ConfigFile) -> Result<(), CliError> {
    let mut config = config.clone();
    config.set(key, value)?;
    config.save()?;

    println!("Set {} = {}", key, value);

    Ok(())
}

/// List all configuration settings.
fn run_list(config: &ConfigFile) -> Result<(), CliError> {
    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = String::new();

    for (section, key, value) in config.entries() {
        // Print section header when section changes
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        if value.is_empty() {
            println!("  {} = (not set)", key);
        } else {
            println!("  {} = {}", key, value);
        }
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path()?.display());
    Ok(())
}
