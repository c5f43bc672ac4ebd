//! Logging setup for host applications.
//!
//! The library only emits `tracing` events; the embedding shell decides
//! whether and where they go by calling [`init`] once at startup.

use crate::config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {source}")]
    Filter {
        /// Offending directive.
        directive: String,
        /// Parser error.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already installed.
    #[error("logging already initialised: {0}")]
    AlreadyInitialised(#[from] tracing_subscriber::util::TryInitError),
}

/// Builds the filter, preferring `RUST_LOG` over the configured directive.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured directive is
/// malformed and `RUST_LOG` is unset or invalid.
pub fn filter_for(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.filter).map_err(|source| TelemetryError::Filter {
            directive: config.filter.clone(),
            source,
        })
    })
}

/// Installs a formatting subscriber as the global default.
///
/// # Errors
///
/// Returns [`TelemetryError`] for a bad filter or when called twice.
pub fn init(config: &LoggingConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(filter_for(config)?)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}
