//! Application state shared across handlers.
//!
//! Everything lives behind one `Arc<AppState>`: the service is small enough
//! that splitting into sub-states would add extraction plumbing without
//! removing any coupling.

use std::sync::Arc;
use std::time::Duration;

use clipdock_core::Config;
use clipdock_db::VideoRepository;
use clipdock_processing::{
    FastStartRewriter, IngestConfig, IngestOrchestrator, SystemToolRunner, ToolRunner, VideoProber,
};
use clipdock_storage::Storage;
use sqlx::PgPool;

use crate::records::DbRecordStore;
use crate::thumbnails::ThumbnailStore;

/// Main application state: configuration, database, storage, and the ingest pipeline.
pub struct AppState {
    pub config: Config,
    pub db_pool: PgPool,
    pub videos: VideoRepository,
    pub storage: Arc<dyn Storage>,
    pub ingest: IngestOrchestrator,
    pub thumbnails: ThumbnailStore,
}

impl AppState {
    /// Wire the repositories and the ingest pipeline from an established
    /// pool and storage backend.
    pub fn initialize(config: &Config, pool: PgPool, storage: Arc<dyn Storage>) -> Arc<Self> {
        let videos = VideoRepository::new(pool.clone());

        // ffprobe and ffmpeg share one runner so both honor the same timeout.
        let runner: Arc<dyn ToolRunner> =
            Arc::new(SystemToolRunner::new(Duration::from_secs(config.tool_timeout_secs)));
        let ingest = IngestOrchestrator::new(
            VideoProber::new(runner.clone(), config.ffprobe_path.clone()),
            FastStartRewriter::new(runner, config.ffmpeg_path.clone()),
            storage.clone(),
            Arc::new(DbRecordStore::new(videos.clone())),
            IngestConfig {
                scratch_dir: config.scratch_dir.clone(),
                max_upload_bytes: config.max_video_size_bytes,
            },
        );

        Arc::new(Self {
            config: config.clone(),
            db_pool: pool,
            videos,
            storage,
            ingest,
            thumbnails: ThumbnailStore::new(config.thumbnail_cache_capacity),
        })
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
