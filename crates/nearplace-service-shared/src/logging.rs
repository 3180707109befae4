//! Structured logging setup for nearplace microservices.
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: output format, either `json` (default) or `text`
//! - `RUST_LOG`: log level filter (default: `info`)
//! - `SERVICE_NAME`: service name for log entries (optional)

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logging (default, production).
    #[default]
    Json,
    /// Human-readable text logging (development).
    Text,
}

impl LogFormat {
    /// Parse a log format, accepting "text" and "pretty" as the text format
    /// and treating anything else as JSON.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Output format (json or text).
    pub format: LogFormat,
    /// Log level filter (e.g., "info", "debug", "warn").
    pub level: String,
    /// Service name to include in log entries.
    pub service: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            service: None,
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        let format = std::env::var("LOG_FORMAT")
            .map(|v| LogFormat::from_str(&v))
            .unwrap_or(LogFormat::Json);

        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let service = std::env::var("SERVICE_NAME").ok();

        Self {
            format,
            level,
            service,
        }
    }

    /// Create a new configuration with the specified service name.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Call once at application startup.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Text => {
            registry.with(fmt::layer().pretty()).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false);

            registry.with(json_layer).init();
        }
    }
}
