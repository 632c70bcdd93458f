//! # Observability
//!
//! Logging setup for the Postboard workspace.
//!
//! Binaries call [`init_with_config`] once at startup and use the `tracing`
//! macros everywhere else. Library crates never install a subscriber.
//!
//! Every event is appended as one JSON object per line to
//! `~/.postboard/logs/dev.jsonl` (or [`LogConfig::log_path`]). Fields named
//! like credentials (`access_token`, `password`, ...) are redacted before
//! they reach the file.
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "cli".into(),
//!     default_level: "debug".into(),
//!     also_stderr: true,
//!     ..Default::default()
//! });
//! tracing::info!("ready");
//! ```

mod file;
mod json_layer;

use file::LogFile;
use json_layer::JsonLayer;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Written as `service` on every line.
    pub service_name: String,

    /// Filter used when `RUST_LOG` is not set.
    pub default_level: String,

    /// Defaults to `~/.postboard/logs/dev.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Also emit compact logs to stderr.
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

/// Falls back to the system temp dir when there is no home directory.
fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".postboard")
        .join("logs")
        .join("dev.jsonl")
}

/// Install the global subscriber.
///
/// A log file that cannot be opened only drops the file output. Later calls
/// leave the first subscriber in place.
pub fn init_with_config(config: LogConfig) {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.default_level))
    };
    let log_path = config.log_path.clone().unwrap_or_else(default_log_path);

    let file_layer = match LogFile::open(&log_path) {
        Ok(file) => Some(JsonLayer::new(config.service_name.clone(), file).with_filter(filter())),
        Err(e) => {
            eprintln!("observability: cannot open {}: {}", log_path.display(), e);
            None
        }
    };

    let stderr_layer = config.also_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .compact()
            .with_writer(io::stderr)
            .with_filter(filter())
    });

    if tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!(log_path = %log_path.display(), "Logging initialized");
    }
}
