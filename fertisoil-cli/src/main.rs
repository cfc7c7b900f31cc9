//! Fertisoil CLI - Command-line interface
//!
//! Predicts fertilizer labels and looks up soil and location data for
//! coordinates. Results go to stdout; diagnostics and logs go to stderr.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use fertisoil::config::ConfigFile;
use fertisoil::logging::init_logging;

use commands::config::ConfigCommands;
use commands::predict::PredictArgs;
use commands::CoordArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "fertisoil")]
#[command(author, version)]
#[command(about = "Fertilizer recommendation and soil texture enrichment")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a fertilizer from eight agronomic features
    Predict(PredictArgs),

    /// Fetch soil properties and texture class for a coordinate
    Soil(CoordArgs),

    /// Reverse geocode a coordinate
    Location(CoordArgs),

    /// Inspect the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let _guard = init_logging(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Predict(args) => commands::predict::run(args, &config),
        Commands::Soil(args) => commands::soil::run(args, &config),
        Commands::Location(args) => commands::location::run(args, &config),
        Commands::Config(command) => commands::config::run(command, &config),
    }
}
