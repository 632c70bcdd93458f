//! File-backed storage: a single JSON object mapping keys to string values.

use crate::{DurableStorage, StorageError, StorageResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

/// Durable storage in one JSON file, rewritten atomically on every change.
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open (or prepare to create) the storage file at `path`.
    ///
    /// Fails when the parent directory cannot be created.
    pub fn new(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<Entries> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Encoding(e.to_string()))
    }

    /// Entries for a write. A corrupt file is replaced rather than blocking writes.
    fn read_entries_for_update(&self) -> StorageResult<Entries> {
        match self.read_entries() {
            Err(StorageError::Encoding(reason)) => {
                warn!(path = %self.path.display(), %reason, "Storage file is corrupt, starting empty");
                Ok(Entries::new())
            }
            other => other,
        }
    }

    fn write_entries(&self, entries: &Entries) -> StorageResult<()> {
        let content =
            serde_json::to_string_pretty(entries).map_err(|e| StorageError::Encoding(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl DurableStorage for FileStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;
        debug!(key = %key, "Stored value");
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_entries()?.remove(key))
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries_for_update()?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_entries(&entries)?;
            debug!(key = %key, "Deleted value");
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json")).unwrap();

        assert_eq!(storage.get("accessToken").unwrap(), None);
        assert!(!storage.delete("accessToken").unwrap());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::new(&path).unwrap();
        storage.set("accessToken", "\"tok1\"").unwrap();
        storage.set("refreshToken", "\"ref1\"").unwrap();
        drop(storage);

        let reopened = FileStorage::new(&path).unwrap();
        assert_eq!(reopened.get("accessToken").unwrap().as_deref(), Some("\"tok1\""));
        assert!(reopened.delete("refreshToken").unwrap());
        assert_eq!(reopened.get("refreshToken").unwrap(), None);
        assert!(reopened.has("accessToken").unwrap());
    }

    #[test]
    fn test_corrupt_file_fails_reads_but_not_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path).unwrap();
        assert!(matches!(storage.get("accessToken"), Err(StorageError::Encoding(_))));

        storage.set("accessToken", "\"tok2\"").unwrap();
        assert_eq!(storage.get("accessToken").unwrap().as_deref(), Some("\"tok2\""));
    }
}
