//! File system paths for Postboard.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Name of the per-user base directory under `$HOME`.
const BASE_DIR_NAME: &str = ".postboard";
/// Durable key/value store holding the persisted credential.
const STORAGE_FILE_NAME: &str = "storage.json";

/// Manages file system paths.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for all Postboard files (~/.postboard)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.postboard`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.postboard).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.postboard/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the durable storage file path (~/.postboard/storage.json).
    pub fn storage_file(&self) -> PathBuf {
        self.base_dir.join(STORAGE_FILE_NAME)
    }

    /// Get the logs directory (~/.postboard/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the central JSONL log path (~/.postboard/logs/dev.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("dev.jsonl")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
