//! The ingest orchestrator.
//!
//! Drives one upload from received bytes to a durable object and an
//! updated video record: validate, stage, classify, rewrite, upload,
//! record. Any failure is terminal for the upload; the record keeps its
//! previous contents and every scratch file is removed before control
//! returns to the caller.

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use clipdock_core::models::VideoRecord;
use clipdock_storage::{keys, Storage, StorageError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

use crate::error::{IngestError, IngestResult};
use crate::faststart::FastStartRewriter;
use crate::probe::VideoProber;
use crate::scratch::ScratchFile;

/// The only media type the pipeline accepts.
pub const ALLOWED_MEDIA_TYPE: &str = "video/mp4";

const MP4_EXTENSION: &str = "mp4";

/// An upload about to be ingested. `content` is read exactly once.
pub struct UploadRequest {
    pub record_id: Uuid,
    pub owner_id: Uuid,
    pub declared_media_type: String,
    pub size_bytes: u64,
    pub content: Pin<Box<dyn AsyncRead + Send + Unpin>>,
}

/// Read and update video records. The api crate implements this over the
/// database repository; tests use an in-memory map.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_video(&self, id: Uuid) -> anyhow::Result<Option<VideoRecord>>;
    async fn update_video(&self, record: &VideoRecord) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Directory for staged uploads and rewrite outputs.
    pub scratch_dir: PathBuf,
    /// Ceiling for a single upload, checked against the declared size
    /// before staging and against the actual byte count while staging.
    pub max_upload_bytes: u64,
}

pub struct IngestOrchestrator {
    prober: VideoProber,
    rewriter: FastStartRewriter,
    storage: Arc<dyn Storage>,
    records: Arc<dyn RecordStore>,
    config: IngestConfig,
}

impl IngestOrchestrator {
    pub fn new(
        prober: VideoProber,
        rewriter: FastStartRewriter,
        storage: Arc<dyn Storage>,
        records: Arc<dyn RecordStore>,
        config: IngestConfig,
    ) -> Self {
        Self {
            prober,
            rewriter,
            storage,
            records,
            config,
        }
    }

    /// Runs the full pipeline for one upload and returns the updated
    /// record.
    pub async fn ingest(&self, request: UploadRequest) -> IngestResult<VideoRecord> {
        let record_id = request.record_id;
        let result = self.run(request).await;
        if let Err(ref e) = result {
            tracing::warn!(
                video_id = %record_id,
                stage = %e.stage(),
                error = %e,
                "video ingest failed"
            );
        }
        result
    }

    async fn run(&self, mut request: UploadRequest) -> IngestResult<VideoRecord> {
        tracing::info!(
            video_id = %request.record_id,
            declared_size_bytes = request.size_bytes,
            "starting video ingest"
        );

        let mut record = self
            .records
            .get_video(request.record_id)
            .await
            .map_err(IngestError::RecordStore)?
            .ok_or(IngestError::RecordNotFound {
                id: request.record_id,
            })?;

        if record.owner_id != request.owner_id {
            return Err(IngestError::OwnershipMismatch {
                id: request.record_id,
            });
        }
        if request.declared_media_type != ALLOWED_MEDIA_TYPE {
            return Err(IngestError::UnsupportedMediaType {
                declared: request.declared_media_type,
            });
        }
        if request.size_bytes > self.config.max_upload_bytes {
            return Err(IngestError::PayloadTooLarge {
                size_bytes: request.size_bytes,
                max_bytes: self.config.max_upload_bytes,
            });
        }

        // Past this point scratch files exist. The guards remove them on
        // every exit path, including early returns via `?`.
        let mut staged = ScratchFile::with_random_name(&self.config.scratch_dir, MP4_EXTENSION);
        let staged_bytes = self.stage(&mut request.content, staged.path()).await?;
        tracing::info!(
            video_id = %record.id,
            staged_bytes,
            path = %staged.path().display(),
            "upload staged"
        );

        let orientation = self.prober.classify(staged.path()).await?;
        tracing::info!(video_id = %record.id, orientation = %orientation, "video classified");

        let mut rewritten = ScratchFile::adopt(self.rewriter.output_path(staged.path()));
        let rewritten_path = self.rewriter.rewrite(staged.path()).await?;
        tracing::info!(
            video_id = %record.id,
            path = %rewritten_path.display(),
            "fast-start rewrite complete"
        );

        let storage_key = keys::video_key(orientation, MP4_EXTENSION);
        let data = tokio::fs::read(&rewritten_path)
            .await
            .map_err(StorageError::from)?;
        let storage_url = self
            .storage
            .upload_file(&storage_key, data, ALLOWED_MEDIA_TYPE)
            .await?;
        tracing::info!(
            video_id = %record.id,
            key = %storage_key,
            url = %storage_url,
            "video uploaded"
        );

        record.storage_url = Some(storage_url);
        record.updated_at = chrono::Utc::now();
        self.records
            .update_video(&record)
            .await
            .map_err(IngestError::RecordStore)?;
        tracing::info!(video_id = %record.id, "video record updated");

        staged.cleanup().await;
        rewritten.cleanup().await;

        Ok(record)
    }

    /// Copies the upload body into the staged file. The copy is capped one
    /// byte past the ceiling so an understated declared size cannot fill
    /// the disk.
    async fn stage(&self, content: impl AsyncRead + Unpin, path: &Path) -> IngestResult<u64> {
        let mut limited = content.take(self.config.max_upload_bytes + 1);
        let mut file = tokio::fs::File::create(path).await?;
        let copied = tokio::io::copy(&mut limited, &mut file).await?;
        file.flush().await?;

        if copied > self.config.max_upload_bytes {
            return Err(IngestError::PayloadTooLarge {
                size_bytes: copied,
                max_bytes: self.config.max_upload_bytes,
            });
        }
        Ok(copied)
    }
}
