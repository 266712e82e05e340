//! Logging initialisation for the `clion` binary.
//!
//! Installs a global `tracing` subscriber writing to `stderr`, so summaries on
//! `stdout` stay machine-readable. Records emitted by the engine through the
//! `log` facade are bridged into the same subscriber. The level is controlled
//! via `RUST_LOG` and defaults to `info`.

use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

static INITIALISED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Installs global logging unless it is already configured.
///
/// # Errors
/// Returns [`LoggingError`] if the subscriber cannot be installed.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })?;

    let _ = INITIALISED.set(());
    Ok(())
}
