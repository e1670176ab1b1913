//! Storage effect interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `flowreg-effects` (Layer 3)
//! - **Usage**: the local expiring store in `flowreg-app`
//!
//! Keys are literal strings with no namespacing scheme; values are opaque
//! bytes (the expiring store writes UTF-8 JSON).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum StorageError {
    /// Reading failed
    #[error("Read failed: {0}")]
    ReadFailed(String),
    /// Writing failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
    /// Deleting failed
    #[error("Delete failed: {0}")]
    DeleteFailed(String),
    /// Listing keys failed
    #[error("List failed: {0}")]
    ListFailed(String),
}

/// Key/value persistence.
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Retrieve the value stored under `key`.
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Remove `key`. Returns whether a value was present.
    async fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// List stored keys, optionally restricted to a prefix.
    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError>;

    /// Check whether `key` is present.
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.retrieve(key).await?.is_some())
    }
}

#[async_trait]
impl<T> StorageEffects for Arc<T>
where
    T: StorageEffects + ?Sized,
{
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        (**self).store(key, value).await
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).retrieve(key).await
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key).await
    }

    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        (**self).list_keys(prefix).await
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        (**self).exists(key).await
    }
}
