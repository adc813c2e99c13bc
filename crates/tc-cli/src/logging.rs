//! Structured diagnostics on standard error.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tc_config::{Config, LogFormat};
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static LOGGING_GUARD: OnceCell<()> = OnceCell::new();

/// Errors encountered while configuring diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The configured filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// The subscriber could not be installed.
    #[error("failed to install log subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on the first call; later calls are no-ops.
///
/// # Errors
///
/// Returns [`LoggingError`] when the filter is invalid or another subscriber
/// was installed outside this function.
pub fn initialise(config: &Config) -> Result<(), LoggingError> {
    LOGGING_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| ())
}

fn install_subscriber(config: &Config) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|error| LoggingError::Filter(error.to_string()))?;

    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::Subscriber)
}
