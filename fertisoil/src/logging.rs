//! Logging setup.
//!
//! Installs a global `tracing` subscriber that writes human-readable lines
//! to stderr and, when a log directory is configured, to a daily-rotated
//! file through a non-blocking writer. Stdout is left alone so command
//! output stays machine-readable.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the configured
//! level raised by the CLI's `-v` count.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Log file name prefix inside the log directory.
pub const LOG_FILE_PREFIX: &str = "fertisoil";

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("Failed to open log directory: {0}")]
    Appender(#[from] InitError),

    #[error("Logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Keeps the file writer alive. Dropping it flushes buffered lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Level names, least verbose first.
const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Resolves the filter directive for a verbosity count.
///
/// `0` keeps the configured directive. Each `-v` raises the default level
/// one step above `warn`, but never below what the configuration already
/// allows. Per-target directives are kept as they are.
pub fn filter_directive(configured: &str, verbose: u8) -> String {
    if verbose == 0 {
        return configured.to_string();
    }
    let requested = (2 + verbose as usize).min(LEVELS.len() - 1);

    let mut has_default = false;
    let mut parts: Vec<String> = configured
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match level_rank(part) {
            Some(rank) => {
                has_default = true;
                LEVELS[rank.max(requested)].to_string()
            }
            None => part.to_string(),
        })
        .collect();

    if !has_default {
        parts.push(LEVELS[requested].to_string());
    }
    parts.join(",")
}

fn level_rank(directive: &str) -> Option<usize> {
    LEVELS
        .iter()
        .position(|level| level.eq_ignore_ascii_case(directive))
}

/// Installs the global subscriber.
pub fn init_logging(settings: &LoggingSettings, verbose: u8) -> Result<LoggingGuard, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directive(&settings.level, verbose))?,
    };

    let timer = OffsetTime::local_rfc_3339().unwrap_or_else(|_| {
        OffsetTime::new(
            time::UtcOffset::UTC,
            time::format_description::well_known::Rfc3339,
        )
    });

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(timer.clone());

    let (file_layer, file_guard) = match &settings.directory {
        Some(directory) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .build(directory)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(timer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(LoggingGuard { _file: file_guard })
}
