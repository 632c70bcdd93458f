//! Durable storage for the Postboard client.
//!
//! This crate provides:
//! - **[`DurableStorage`]**: the string key/value medium (file-backed or in-memory)
//! - **[`TokenStore`]**: JSON-encoded, fail-soft credential persistence on top of it

mod file;
mod keys;
mod memory;
mod token_store;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use token_store::{Credential, TokenStore};
pub use traits::DurableStorage;

use postboard_config_and_utils::Paths;
use thiserror::Error;
use tracing::warn;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend refused the operation
    #[error("Platform storage error: {0}")]
    Platform(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed storage at `paths.storage_file()`.
pub fn create_storage(paths: &Paths) -> StorageResult<Box<dyn DurableStorage>> {
    let storage = FileStorage::new(paths.storage_file())?;
    Ok(Box::new(storage))
}

/// Create a TokenStore over the default storage.
///
/// When the medium cannot be prepared the store runs without persistence
/// instead of failing startup.
pub fn create_token_store(paths: &Paths) -> TokenStore {
    match create_storage(paths) {
        Ok(storage) => TokenStore::new(storage),
        Err(e) => {
            warn!(error = %e, "Durable storage unavailable, credentials will not persist");
            TokenStore::unavailable()
        }
    }
}
