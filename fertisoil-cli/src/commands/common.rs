//! Common types and utilities shared across CLI commands.

use clap::Args;
use fertisoil::coord::Coordinate;
use fertisoil::provider::ReqwestClient;
use serde::Serialize;
use std::time::Duration;

use crate::error::CliError;

/// `--lat` / `--lon` pair used by the soil and location commands.
#[derive(Debug, Args)]
pub struct CoordArgs {
    /// Latitude in decimal degrees (-90 to 90)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

impl CoordArgs {
    pub fn coordinate(&self) -> Result<Coordinate, CliError> {
        Ok(Coordinate::new(self.lat, self.lon)?)
    }
}

/// Build the blocking HTTP client for a provider.
pub fn http_client(timeout: Duration) -> Result<ReqwestClient, CliError> {
    Ok(ReqwestClient::with_timeout(timeout)?)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
