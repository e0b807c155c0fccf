//! S3 storage backend built on `object_store`.

use std::time::Instant;

use async_trait::async_trait;
use clipdock_core::StorageBackend;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{Error as ObjectStoreError, ObjectStoreExt, PutPayload};

use crate::traits::{Storage, StorageError, StorageResult};

/// Virtual-hosted URL for the default AWS endpoint, path-style for custom
/// endpoints (MinIO, localstack).
fn format_object_url(bucket: &str, region: &str, endpoint: Option<&str>, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[derive(Debug)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint: Option<String>,
}

impl S3Storage {
    /// Credentials come from the usual AWS environment variables or the
    /// instance metadata service.
    pub fn new(bucket: String, region: String, endpoint: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint {
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(format!("failed to build S3 client: {}", e)))?;

        Ok(Self {
            store,
            bucket,
            region,
            endpoint,
        })
    }

    fn generate_url(&self, storage_key: &str) -> String {
        format_object_url(
            &self.bucket,
            &self.region,
            self.endpoint.as_deref(),
            storage_key,
        )
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_file(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        let start = Instant::now();
        let size_bytes = data.len();
        let path = Path::from(storage_key);

        match self.store.put(&path, PutPayload::from(data)).await {
            Ok(_) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %storage_key,
                    size_bytes,
                    content_type,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "uploaded object to S3"
                );
                Ok(self.generate_url(storage_key))
            }
            Err(e) => {
                tracing::error!(
                    bucket = %self.bucket,
                    key = %storage_key,
                    error = %e,
                    "S3 upload failed"
                );
                Err(StorageError::UploadFailed(e.to_string()))
            }
        }
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = Path::from(storage_key);
        let result = self.store.get(&path).await.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;
        let data = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;
        Ok(data.to_vec())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = Path::from(storage_key);
        match self.store.delete(&path).await {
            Ok(()) => {
                tracing::info!(bucket = %self.bucket, key = %storage_key, "deleted object from S3");
                Ok(())
            }
            Err(ObjectStoreError::NotFound { .. }) => Ok(()),
            Err(e) => {
                tracing::error!(
                    bucket = %self.bucket,
                    key = %storage_key,
                    error = %e,
                    "S3 delete failed"
                );
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = Path::from(storage_key);
        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_hosted_url_for_aws() {
        let url = format_object_url(
            "clipdock-media",
            "eu-west-1",
            None,
            "landscape/0a1b.mp4",
        );
        assert_eq!(
            url,
            "https://clipdock-media.s3.eu-west-1.amazonaws.com/landscape/0a1b.mp4"
        );
    }

    #[test]
    fn test_path_style_url_for_custom_endpoint() {
        let url = format_object_url(
            "clipdock-media",
            "us-east-1",
            Some("http://localhost:9000/"),
            "other/ff00.mp4",
        );
        assert_eq!(url, "http://localhost:9000/clipdock-media/other/ff00.mp4");
    }
}
