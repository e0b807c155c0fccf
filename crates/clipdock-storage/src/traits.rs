//! Storage trait and error types.

use async_trait::async_trait;
use clipdock_core::StorageBackend;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Callers address objects by storage key. Writing to an existing key
/// silently replaces the previous object; there is no versioning at this
/// layer.
#[async_trait]
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Store `data` under `storage_key` and return the public URL.
    async fn upload_file(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Fetch the full object for a storage key.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object. Deleting a key that does not exist is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check whether an object exists without fetching it.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
