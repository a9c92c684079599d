//! Logging setup.
//!
//! The crate only emits `tracing` events; installing a subscriber is the
//! host's call. [`init`] is the stock choice: a fmt layer filtered by
//! `RUST_LOG`, falling back to `debug` for this crate when the config's
//! `debug` flag is on and `warn` otherwise.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::error::WidgetError;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(config: &Config) -> String {
    let level = if config.debug { "debug" } else { "warn" };
    format!("spark_widgets={level}")
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &Config) -> Result<(), WidgetError> {
    // Precedence: RUST_LOG > config debug flag
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|err| WidgetError::Logging(err.to_string()))
}
