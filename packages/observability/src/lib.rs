//! # Observability
//!
//! Centralized logging for the Sohwagi shell workspace.
//!
//! Crates in this workspace are **log producers**: they use the standard
//! `tracing` macros and never decide where logs go. The host binary calls
//! [`init_with_config`] once at startup, which installs:
//!
//! - a JSONL file layer (default `~/.sohwagi/logs/dev.jsonl`) with
//!   sensitive-field redaction, so session tokens never reach disk
//! - an optional compact stderr layer for foreground runs
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "shell".into(),
//!     default_level: "debug".into(),
//!     also_stderr: true,
//!     ..Default::default()
//! });
//! tracing::info!("shell started");
//! ```

mod json_layer;
mod redact;
mod sink;

use std::path::PathBuf;

pub use json_layer::{JsonLayer, LogEntry};
pub use redact::{redact_fields, REDACTED};
pub use sink::{default_log_path, CentralLogWriter, WriterFactory};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service (e.g., "shell", "host").
    /// Included in every log line for filtering.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// Optional custom log file path.
    /// Defaults to `~/.sohwagi/logs/dev.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Also emit logs to stderr for immediate feedback.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Initialize the observability layer with custom configuration.
///
/// Falls back to stderr-only logging if the log file cannot be opened.
/// Calling this twice is harmless; the second subscriber is ignored.
pub fn init_with_config(config: LogConfig) {
    sink::init_subscriber(&config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.service_name, "unknown");
        assert_eq!(config.default_level, "info");
        assert!(config.log_path.is_none());
        assert!(!config.also_stderr);
    }
}
