//! Structured logging initialization
//!
//! The engines only emit `tracing` events; the host application decides
//! where they go by calling [`init_logging`] once at startup.

use crate::error::RecommenderError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable, multi-line
    #[default]
    Pretty,
    /// Compact single-line text
    Compact,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is not set (default: "info")
    pub level: String,
    pub format: LogFormat,
    /// Include the event target (module path) in the output
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_target: true,
        }
    }
}

impl LogConfig {
    pub fn validate(&self) -> Result<(), RecommenderError> {
        EnvFilter::try_new(&self.level).map_err(|e| {
            RecommenderError::configuration(
                format!("invalid log level directive '{}': {}", self.level, e),
                "BOOKREC_LOGGING__LEVEL",
            )
        })?;
        Ok(())
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `config.level`.
///
/// # Errors
///
/// Returns a `ConfigurationError` if the level directive is invalid or a
/// global subscriber has already been installed.
pub fn init_logging(config: &LogConfig) -> Result<(), RecommenderError> {
    config.validate()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(config.with_target),
            )
            .try_init(),
    };

    result.map_err(|e| RecommenderError::ConfigurationError {
        message: format!("Failed to initialize tracing subscriber: {}", e),
        key: None,
    })?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");

    Ok(())
}
