//! Tracing subscriber setup for the Tagbot binaries

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install a stderr fmt subscriber. `RUST_LOG` wins over the configured filter.
///
/// Stdout is left untouched because the node binary writes events there.
pub fn init_tracing(logging_config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(&logging_config.filter)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    tracing::debug!(target: "logging", filter = %logging_config.filter, "logging initialized");
    Ok(())
}

fn build_env_filter(fallback: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    if fallback.trim().is_empty() {
        return Err(anyhow!("logging.filter cannot be empty"));
    }
    EnvFilter::try_new(fallback).with_context(|| format!("failed to parse log filter '{}'", fallback))
}
