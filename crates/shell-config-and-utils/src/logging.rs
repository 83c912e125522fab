//! Logging initialization for the shell.
//!
//! Thin wrapper over the observability package so every binary in the
//! workspace logs to the same JSONL file with the same redaction rules.

use crate::Paths;
use observability::LogConfig;

/// Initialize logging for a shell service.
///
/// Writes JSONL to `<base>/logs/dev.jsonl`. `RUST_LOG` wins over `level`.
/// Set `SOHWAGI_LOG_STDERR=0` to silence the stderr mirror.
pub fn init_logging(service_name: &str, level: &str, paths: &Paths) {
    let also_stderr = std::env::var("SOHWAGI_LOG_STDERR")
        .map(|raw| raw.trim() != "0")
        .unwrap_or(true);

    observability::init_with_config(LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        log_path: Some(paths.log_file()),
        also_stderr,
    });
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
