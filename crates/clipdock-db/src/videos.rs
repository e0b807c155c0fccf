//! Video record persistence.

use chrono::Utc;
use clipdock_core::models::VideoRecord;
use clipdock_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, title, description), fields(db.table = "videos", db.operation = "insert"))]
    pub async fn create(
        &self,
        owner_id: Uuid,
        title: String,
        description: Option<String>,
    ) -> Result<VideoRecord, AppError> {
        let video = sqlx::query_as::<Postgres, VideoRecord>(
            r#"
            INSERT INTO videos (id, owner_id, title, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let video = sqlx::query_as::<Postgres, VideoRecord>(
            "SELECT * FROM videos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<VideoRecord>, AppError> {
        let videos = sqlx::query_as::<Postgres, VideoRecord>(
            "SELECT * FROM videos WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(videos)
    }

    /// Writes every mutable column from `record`. Concurrent updates to
    /// the same row resolve last-writer-wins.
    #[tracing::instrument(skip(self, record), fields(db.table = "videos", db.operation = "update", video_id = %record.id))]
    pub async fn update(&self, record: &VideoRecord) -> Result<VideoRecord, AppError> {
        let video = sqlx::query_as::<Postgres, VideoRecord>(
            r#"
            UPDATE videos
            SET title = $2,
                description = $3,
                storage_url = $4,
                thumbnail_url = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.storage_url)
        .bind(&record.thumbnail_url)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(video)
    }

    /// Returns false when no row matched.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
