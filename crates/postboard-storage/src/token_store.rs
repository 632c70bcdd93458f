//! Fail-soft credential persistence on top of a [`DurableStorage`] backend.
//!
//! Losing a persisted token only means the user logs in again, so nothing
//! here returns an error: reads degrade to `None`, writes and deletes are
//! best-effort and logged.

use crate::{DurableStorage, MemoryStorage, StorageKeys};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Bearer token pair used to authorize requests.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// JSON-encoding, fail-soft view over the durable medium.
pub struct TokenStore {
    backend: Option<Box<dyn DurableStorage>>,
}

impl TokenStore {
    /// Token store over the given backend.
    pub fn new(backend: Box<dyn DurableStorage>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Token store with no durable medium: reads return `None`, writes are dropped.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    /// Token store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Whether a durable medium is attached.
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Read and JSON-decode a value. Missing, unreadable and undecodable
    /// values all read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = self.backend.as_ref()?;
        let raw = match backend.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %key, error = %e, "Durable storage read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Stored value is not valid JSON, ignoring");
                None
            }
        }
    }

    /// JSON-encode and write a value, best-effort.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let Some(backend) = self.backend.as_ref() else {
            debug!(key = %key, "No durable storage, dropping write");
            return;
        };
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode value for storage");
                return;
            }
        };
        if let Err(e) = backend.set(key, &encoded) {
            warn!(key = %key, error = %e, "Durable storage write failed");
        }
    }

    /// Delete a value, best-effort.
    pub fn remove(&self, key: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if let Err(e) = backend.delete(key) {
            warn!(key = %key, error = %e, "Durable storage delete failed");
        }
    }

    /// Persist a credential. The refresh slot is only written when the
    /// credential carries one; an older refresh token is left in place.
    pub fn save_credential(&self, credential: &Credential) {
        self.set(StorageKeys::ACCESS_TOKEN, &credential.access_token);
        if let Some(refresh_token) = &credential.refresh_token {
            self.set(StorageKeys::REFRESH_TOKEN, refresh_token);
        }
    }

    /// The persisted credential, if an access token is stored.
    pub fn load_credential(&self) -> Option<Credential> {
        let access_token: String = self.get(StorageKeys::ACCESS_TOKEN)?;
        Some(Credential {
            access_token,
            refresh_token: self.get(StorageKeys::REFRESH_TOKEN),
        })
    }

    /// Remove both credential slots.
    pub fn clear_credential(&self) {
        self.remove(StorageKeys::ACCESS_TOKEN);
        self.remove(StorageKeys::REFRESH_TOKEN);
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("available", &self.is_available())
            .finish()
    }
}
