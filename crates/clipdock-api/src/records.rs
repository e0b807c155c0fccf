//! Database-backed record store for the ingest pipeline.

use async_trait::async_trait;
use clipdock_core::VideoRecord;
use clipdock_db::VideoRepository;
use clipdock_processing::RecordStore;
use uuid::Uuid;

/// Adapts `VideoRepository` to the pipeline's `RecordStore` trait so the
/// processing crate stays free of sqlx.
pub struct DbRecordStore {
    videos: VideoRepository,
}

impl DbRecordStore {
    pub fn new(videos: VideoRepository) -> Self {
        Self { videos }
    }
}

#[async_trait]
impl RecordStore for DbRecordStore {
    async fn get_video(&self, id: Uuid) -> anyhow::Result<Option<VideoRecord>> {
        Ok(self.videos.get_by_id(id).await?)
    }

    async fn update_video(&self, record: &VideoRecord) -> anyhow::Result<()> {
        self.videos.update(record).await?;
        Ok(())
    }
}
