//! Logging initialization.
//!
//! Thin wrapper over the observability crate so binaries get the same
//! JSONL file output (`~/.postboard/logs/dev.jsonl`) and level handling.

use observability::LogConfig;
use std::path::PathBuf;

/// Initialize logging for the command-line client.
///
/// `RUST_LOG` still wins over `level` when set.
///
/// ```ignore
/// init_logging("info", None);
/// tracing::info!("client started");
/// ```
pub fn init_logging(level: &str, log_path: Option<PathBuf>) {
    init_logging_for_service("cli", level, log_path);
}

/// Initialize logging with a custom service name.
pub fn init_logging_for_service(service_name: &str, level: &str, log_path: Option<PathBuf>) {
    let also_stderr = matches!(parse_level(level), tracing::Level::TRACE | tracing::Level::DEBUG);

    observability::init_with_config(LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        log_path,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_all_variants() {
        assert_eq!(parse_level("trace"), tracing::Level::TRACE);
        assert_eq!(parse_level("debug"), tracing::Level::DEBUG);
        assert_eq!(parse_level("info"), tracing::Level::INFO);
        assert_eq!(parse_level("warn"), tracing::Level::WARN);
        assert_eq!(parse_level("warning"), tracing::Level::WARN);
        assert_eq!(parse_level("error"), tracing::Level::ERROR);
    }

    #[test]
    fn parse_level_case_insensitive() {
        assert_eq!(parse_level("TRACE"), tracing::Level::TRACE);
        assert_eq!(parse_level("Debug"), tracing::Level::DEBUG);
        assert_eq!(parse_level("WARNING"), tracing::Level::WARN);
    }

    #[test]
    fn parse_level_unknown_defaults_to_info() {
        assert_eq!(parse_level(""), tracing::Level::INFO);
        assert_eq!(parse_level("verbose"), tracing::Level::INFO);
    }
}
