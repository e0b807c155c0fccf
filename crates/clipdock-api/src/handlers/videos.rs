//! CRUD handlers for video records.

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use clipdock_core::{AppError, VideoResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video record created", body = VideoResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(
        user_id = %ctx.user_id,
        operation = "create_video"
    )
)]
pub async fn create_video(
    ctx: AuthContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateVideoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title must not be empty".to_string()).into());
    }

    let video = state
        .videos
        .create(ctx.user_id, title.to_string(), body.description)
        .await
        .map_err(HttpAppError::from)?;

    Ok((StatusCode::CREATED, Json(VideoResponse::from(video))))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Videos owned by the caller", body = Vec<VideoResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(
        user_id = %ctx.user_id,
        operation = "list_videos"
    )
)]
pub async fn list_videos(
    ctx: AuthContext,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state
        .videos
        .list_by_owner(ctx.user_id)
        .await
        .map_err(HttpAppError::from)?;

    let responses: Vec<VideoResponse> = videos.into_iter().map(VideoResponse::from).collect();
    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = VideoResponse),
        (status = 403, description = "Video owned by another user", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(
        user_id = %ctx.user_id,
        video_id = %id,
        operation = "get_video"
    )
)]
pub async fn get_video(
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .videos
        .get_by_id(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.owner_id != ctx.user_id {
        return Err(AppError::Forbidden("You do not have access to this video".to_string()).into());
    }

    Ok(Json(VideoResponse::from(video)))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 403, description = "Video owned by another user", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(
        user_id = %ctx.user_id,
        video_id = %id,
        operation = "delete_video"
    )
)]
pub async fn delete_video(
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .videos
        .get_by_id(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.owner_id != ctx.user_id {
        return Err(AppError::Forbidden("You do not have access to this video".to_string()).into());
    }

    // Best-effort object cleanup; a failed delete leaves an orphan in
    // storage, not a broken record.
    if let Some(url) = &video.storage_url {
        if let Some(key) = storage_key_from_url(url) {
            if let Err(e) = state.storage.delete(&key).await {
                tracing::warn!(error = %e, video_id = %id, key = %key, "Failed to delete stored object");
            }
        }
    }
    state.thumbnails.remove(&id);

    // The fetch above confirmed the row; a false here means a concurrent
    // delete already won, which is fine for an idempotent DELETE.
    state.videos.delete(id).await.map_err(HttpAppError::from)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Recover the object key from a stored URL. Keys are always
/// `<orientation>/<digest>.mp4`, so the last two path segments are the key
/// no matter which backend produced the URL.
fn storage_key_from_url(url: &str) -> Option<String> {
    let mut segments = url.rsplit('/');
    let file = segments.next().filter(|s| !s.is_empty())?;
    let prefix = segments.next().filter(|s| !s.is_empty())?;
    Some(format!("{}/{}", prefix, file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_from_s3_url() {
        let url = "https://clips.s3.eu-west-1.amazonaws.com/landscape/0f3e97e25ab0e9f1a2c02e26cb2f2d0f0f3e97e25ab0e9f1a2c02e26cb2f2d0f.mp4";
        assert_eq!(
            storage_key_from_url(url).as_deref(),
            Some("landscape/0f3e97e25ab0e9f1a2c02e26cb2f2d0f0f3e97e25ab0e9f1a2c02e26cb2f2d0f.mp4")
        );
    }

    #[test]
    fn test_storage_key_from_local_url() {
        let url = "http://localhost:8080/media/portrait/abc123.mp4";
        assert_eq!(
            storage_key_from_url(url).as_deref(),
            Some("portrait/abc123.mp4")
        );
    }

    #[test]
    fn test_storage_key_from_garbage() {
        assert_eq!(storage_key_from_url("not-a-url"), None);
        assert_eq!(storage_key_from_url(""), None);
        assert_eq!(storage_key_from_url("trailing/"), None);
    }
}
