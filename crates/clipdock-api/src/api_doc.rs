//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use clipdock_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clipdock API",
        version = "0.1.0",
        description = "Video upload service. Uploads are validated as MP4, classified by orientation, rewritten for fast-start playback, and stored in object storage under a content-addressed key."
    ),
    paths(
        // Videos
        handlers::videos::create_video,
        handlers::videos::list_videos,
        handlers::videos::get_video,
        handlers::videos::delete_video,
        handlers::video_upload::upload_video,
        // Thumbnails
        handlers::thumbnails::upload_thumbnail,
        handlers::thumbnails::get_thumbnail,
    ),
    components(schemas(
        models::VideoResponse,
        handlers::videos::CreateVideoRequest,
        error::ErrorResponse,
    )),
    tags(
        (name = "videos", description = "Video records and the upload pipeline"),
        (name = "thumbnails", description = "Cached thumbnail upload and serving")
    )
)]
pub struct ApiDoc;
