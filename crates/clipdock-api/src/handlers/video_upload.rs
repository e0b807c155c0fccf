//! Video upload handler.
//!
//! The heavy lifting happens in the processing crate; this handler only
//! pulls the file out of the multipart form and hands it to the pipeline.

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use clipdock_core::VideoResponse;
use clipdock_processing::UploadRequest;
use std::io::Cursor;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/videos/{id}/upload",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video ingested", body = VideoResponse),
        (status = 400, description = "Malformed multipart form", body = ErrorResponse),
        (status = 403, description = "Video owned by another user", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File exceeds the size ceiling", body = ErrorResponse),
        (status = 415, description = "Not an MP4 upload", body = ErrorResponse),
        (status = 422, description = "File is not a readable video", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(
        user_id = %ctx.user_id,
        video_id = %id,
        operation = "upload_video"
    )
)]
pub async fn upload_video(
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = crate::upload::read_file_field(multipart, "video")
        .await
        .map_err(HttpAppError::from)?;

    tracing::info!(
        media_type = %file.media_type,
        size_bytes = file.bytes.len(),
        "Received video upload"
    );

    let request = UploadRequest {
        record_id: id,
        owner_id: ctx.user_id,
        declared_media_type: file.media_type,
        size_bytes: file.bytes.len() as u64,
        content: Box::pin(Cursor::new(file.bytes)),
    };

    let video = state
        .ingest
        .ingest(request)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(VideoResponse::from(video)))
}
