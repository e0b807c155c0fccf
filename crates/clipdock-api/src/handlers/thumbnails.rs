//! Thumbnail upload and serving.
//!
//! Thumbnails are cached in memory only (see `ThumbnailStore`), so the
//! serve path never touches the database or object storage.

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::thumbnails::CachedThumbnail;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use clipdock_core::{AppError, VideoResponse};
use std::sync::Arc;
use uuid::Uuid;

const THUMBNAIL_MEDIA_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];
const MAX_THUMBNAIL_SIZE_BYTES: usize = 2 * 1024 * 1024;

#[utoipa::path(
    post,
    path = "/api/videos/{id}/thumbnail",
    tag = "thumbnails",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Thumbnail cached", body = VideoResponse),
        (status = 400, description = "Malformed multipart form", body = ErrorResponse),
        (status = 403, description = "Video owned by another user", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Thumbnail too large", body = ErrorResponse),
        (status = 415, description = "Not an accepted image type", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(
        user_id = %ctx.user_id,
        video_id = %id,
        operation = "upload_thumbnail"
    )
)]
pub async fn upload_thumbnail(
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut video = state
        .videos
        .get_by_id(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.owner_id != ctx.user_id {
        return Err(AppError::Forbidden("You do not have access to this video".to_string()).into());
    }

    let file = crate::upload::read_file_field(multipart, "thumbnail")
        .await
        .map_err(HttpAppError::from)?;

    if !THUMBNAIL_MEDIA_TYPES.contains(&file.media_type.as_str()) {
        return Err(AppError::UnsupportedMediaType(format!(
            "{} is not supported; upload one of: {}",
            file.media_type,
            THUMBNAIL_MEDIA_TYPES.join(", ")
        ))
        .into());
    }
    if file.bytes.len() > MAX_THUMBNAIL_SIZE_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "{} bytes exceeds the {} byte thumbnail limit",
            file.bytes.len(),
            MAX_THUMBNAIL_SIZE_BYTES
        ))
        .into());
    }

    state.thumbnails.insert(
        id,
        CachedThumbnail {
            media_type: file.media_type,
            bytes: file.bytes,
        },
    );

    video.thumbnail_url = Some(format!("/api/thumbnails/{}", id));
    video.updated_at = Utc::now();
    let video = state
        .videos
        .update(&video)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(VideoResponse::from(video)))
}

#[utoipa::path(
    get,
    path = "/api/thumbnails/{id}",
    tag = "thumbnails",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Thumbnail image bytes"),
        (status = 404, description = "No cached thumbnail for this video", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = %id, operation = "get_thumbnail"))]
pub async fn get_thumbnail(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Evicted or never uploaded both land here; the client re-uploads.
    let thumbnail = state
        .thumbnails
        .get(&id)
        .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, thumbnail.media_type)],
        thumbnail.bytes,
    ))
}
