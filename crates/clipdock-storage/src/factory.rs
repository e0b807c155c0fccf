//! Builds the storage backend selected by configuration.

use std::sync::Arc;

use clipdock_core::{Config, StorageBackend};

use crate::traits::{Storage, StorageError, StorageResult};

pub fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            #[cfg(feature = "storage-s3")]
            {
                let bucket = config.s3_bucket.clone().ok_or_else(|| {
                    StorageError::ConfigError("S3_BUCKET is not set".to_string())
                })?;
                let region = config.s3_region.clone().ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION is not set".to_string())
                })?;
                let storage =
                    crate::s3::S3Storage::new(bucket, region, config.s3_endpoint.clone())?;
                Ok(Arc::new(storage) as Arc<dyn Storage>)
            }
            #[cfg(not(feature = "storage-s3"))]
            {
                Err(StorageError::ConfigError(
                    "built without the storage-s3 feature".to_string(),
                ))
            }
        }
        StorageBackend::Local => {
            #[cfg(feature = "storage-local")]
            {
                let root = config.local_storage_path.clone().ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH is not set".to_string())
                })?;
                let base_url = config.local_base_url.clone().ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_BASE_URL is not set".to_string())
                })?;
                Ok(Arc::new(crate::local::LocalStorage::new(root, base_url)) as Arc<dyn Storage>)
            }
            #[cfg(not(feature = "storage-local"))]
            {
                Err(StorageError::ConfigError(
                    "built without the storage-local feature".to_string(),
                ))
            }
        }
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;

    fn local_config(root: &std::path::Path) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "postgresql://localhost/clipdock".to_string(),
            database_max_connections: 1,
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some(root.display().to_string()),
            local_base_url: Some("http://localhost:8080/files".to_string()),
            scratch_dir: std::env::temp_dir(),
            max_video_size_bytes: 1 << 30,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            tool_timeout_secs: 120,
            thumbnail_cache_capacity: 8,
            cors_origins: Vec::new(),
        }
    }

    #[test]
    fn test_creates_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let storage = create_storage(&local_config(dir.path())).unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[test]
    fn test_local_backend_requires_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = local_config(dir.path());
        config.local_storage_path = None;
        let err = create_storage(&config).unwrap_err();
        assert!(matches!(err, StorageError::ConfigError(_)));
    }
}
