//! JSON-file storage handler
//!
//! Persists the whole key space as a single JSON object of string values, the
//! same shape browser local storage exposes. Writes go to a temporary sibling
//! file first and are renamed into place.

use async_trait::async_trait;
use flowreg_core::effects::{StorageEffects, StorageError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// File-backed storage handler.
#[derive(Debug, Clone)]
pub struct FilesystemStorageHandler {
    path: PathBuf,
    data: Arc<Mutex<BTreeMap<String, String>>>,
}

impl FilesystemStorageHandler {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is logged and treated
    /// as empty; it is overwritten by the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let data = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "discarding unreadable store file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::ReadFailed(e.to_string())),
        };
        debug!(path = %path.display(), keys = data.len(), "opened store file");
        Ok(Self {
            path,
            data: Arc::new(Mutex::new(data)),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, data: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            }
        }
        let bytes =
            serde_json::to_vec_pretty(data).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }
}

#[async_trait]
impl StorageEffects for FilesystemStorageHandler {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let value = String::from_utf8(value)
            .map_err(|e| StorageError::WriteFailed(format!("value for {key} is not UTF-8: {e}")))?;
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        next.insert(key.to_string(), value);
        self.flush(&next).await?;
        *data = next;
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let data = self.data.lock().await;
        Ok(data.get(key).map(|v| v.clone().into_bytes()))
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        if next.remove(key).is_none() {
            return Ok(false);
        }
        self.flush(&next)
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;
        *data = next;
        Ok(true)
    }

    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        let data = self.data.lock().await;
        Ok(data
            .keys()
            .filter(|k| prefix.map_or(true, |p| k.starts_with(p)))
            .cloned()
            .collect())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let data = self.data.lock().await;
        Ok(data.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let storage = FilesystemStorageHandler::open(&path).await.unwrap();
        storage
            .store("jwt", br#"{"expires":1,"item":"abc"}"#.to_vec())
            .await
            .unwrap();
        storage.store("other", b"1".to_vec()).await.unwrap();
        assert!(storage.remove("other").await.unwrap());

        let reopened = FilesystemStorageHandler::open(&path).await.unwrap();
        assert_eq!(
            reopened.retrieve("jwt").await.unwrap(),
            Some(br#"{"expires":1,"item":"abc"}"#.to_vec())
        );
        assert!(!reopened.exists("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_flush_leaves_memory_matching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let storage = FilesystemStorageHandler::open(&path).await.unwrap();
        storage.store("jwt", b"token".to_vec()).await.unwrap();

        // A directory where the temp file goes makes every flush fail.
        std::fs::create_dir(dir.path().join("store.tmp")).unwrap();

        let removed = storage.remove("jwt").await;
        assert!(matches!(removed, Err(StorageError::DeleteFailed(_))));
        assert!(storage.exists("jwt").await.unwrap());

        let stored = storage.store("other", b"1".to_vec()).await;
        assert!(matches!(stored, Err(StorageError::WriteFailed(_))));
        assert!(!storage.exists("other").await.unwrap());

        let reopened = FilesystemStorageHandler::open(&path).await.unwrap();
        assert!(reopened.exists("jwt").await.unwrap());
        assert!(!reopened.exists("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"not json").unwrap();

        let storage = FilesystemStorageHandler::open(&path).await.unwrap();
        assert!(storage.list_keys(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_non_utf8_values() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesystemStorageHandler::open(dir.path().join("s.json"))
            .await
            .unwrap();

        let result = storage.store("bin", vec![0xff, 0xfe]).await;
        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
    }
}
