//! CLI error type.

use std::fmt;

use fertisoil::config::ConfigError;
use fertisoil::coord::CoordError;
use fertisoil::logging::LoggingError;
use fertisoil::prediction::{ArtifactError, InputError};
use fertisoil::provider::ProviderError;

/// Any failure that ends a command with exit status 1.
#[derive(Debug)]
pub enum CliError {
    Input(InputError),
    Artifact(ArtifactError),
    Coord(CoordError),
    Config(ConfigError),
    Provider(ProviderError),
    Logging(LoggingError),
    Output(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Input(e) => write!(f, "Invalid input: {}", e),
            CliError::Artifact(e) => write!(f, "Model artifacts unavailable: {}", e),
            CliError::Coord(e) => write!(f, "Invalid coordinate: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Provider(e) => write!(f, "HTTP client setup failed: {}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Output(e) => write!(f, "Failed to render output: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<InputError> for CliError {
    fn from(e: InputError) -> Self {
        CliError::Input(e)
    }
}

impl From<ArtifactError> for CliError {
    fn from(e: ArtifactError) -> Self {
        CliError::Artifact(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}

impl CliError {
    /// Prints the error to stderr and exits with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(1);
    }
}
