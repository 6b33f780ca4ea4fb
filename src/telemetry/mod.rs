//! Tracing setup for the binary.
//!
//! Events go to a `fmt` layer on stderr (text or JSON) and to a
//! [`LogBuffer`] that keeps the most recent entries in memory.

mod log_buffer;

pub use log_buffer::{DEFAULT_LOG_CAPACITY, LogBuffer, LogEntry};

use crate::config::Config;
use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if `RUST_LOG` is not a valid filter directive or a global
/// subscriber is already installed.
pub fn init_tracing(config: &Config, buffer: &LogBuffer) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid RUST_LOG directive '{}'", config.log_level))?;

    let fmt_layer = if config.log_format == "json" {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(buffer.clone())
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
