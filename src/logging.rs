//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{MediSnowError, Result};

/// Filter from `RUST_LOG` when set, else the configured level
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine readable.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.level))
        .with_writer(std::io::stderr);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.pretty().try_init(),
    };

    installed.map_err(|e| MediSnowError::config(format!("Failed to initialize logging: {e}")))?;
    tracing::debug!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}
