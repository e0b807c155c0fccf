pub mod thumbnails;
pub mod video_upload;
pub mod videos;
