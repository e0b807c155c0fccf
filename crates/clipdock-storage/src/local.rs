//! Local filesystem storage backend.
//!
//! Useful for development and single-node deployments. Files live under a
//! configured root and are served by whatever fronts that directory, so
//! URLs are `<base_url>/<storage_key>`.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use clipdock_core::StorageBackend;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::traits::{Storage, StorageError, StorageResult};

#[derive(Debug)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            base_url,
        }
    }

    /// Maps a storage key onto a path under the root. Keys with absolute or
    /// parent-directory components are rejected before touching the
    /// filesystem.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty() {
            return Err(StorageError::InvalidKey("empty storage key".to_string()));
        }
        if storage_key.starts_with('/') || storage_key.split('/').any(|part| part == "..") {
            return Err(StorageError::InvalidKey(format!(
                "storage key escapes the storage root: {}",
                storage_key
            )));
        }
        Ok(self.root.join(storage_key))
    }

    fn generate_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url, storage_key)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_file(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;

        tracing::info!(
            key = %storage_key,
            size_bytes = data.len(),
            content_type,
            path = %path.display(),
            "stored file locally"
        );
        Ok(self.generate_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        match fs::metadata(&path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
