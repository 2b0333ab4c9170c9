//! jolokia-exporter library
//!
//! Polls a Jolokia JMX-over-HTTP bridge with one bulk read request per
//! scrape, flattens the returned attribute values into sanitized metric
//! names and exposes them in Prometheus text format.

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod exposition;
pub mod metrics;
pub mod naming;
pub mod server;
pub mod sink;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging subsystem
///
/// `RUST_LOG` wins over `level` when it is set.
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
