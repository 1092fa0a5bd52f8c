//! Logging initialization for authgate
//!
//! Sets up the global `tracing` subscriber from the logging configuration.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Telemetry error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TelemetryError {
    /// Failed to initialize the tracing subscriber
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Initialize the global tracing subscriber
///
/// The log level and output format (json or pretty) come from configuration.
/// Fails if a global subscriber has already been installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let level = parse_level(&config.level);
    let filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    if config.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    }

    Ok(())
}

fn parse_level(log_level: &str) -> Level {
    match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: Level strings parse case-insensitively
    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    // Test 2: Unknown level strings fall back to info
    #[test]
    fn test_parse_level_unknown_defaults_to_info() {
        assert_eq!(parse_level("verbose"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    // Test 3: TelemetryError message formatting
    #[test]
    fn test_telemetry_error_message() {
        let err = TelemetryError::Init("already set".to_string());
        assert_eq!(err.to_string(), "Failed to initialize logging: already set");
    }
}
