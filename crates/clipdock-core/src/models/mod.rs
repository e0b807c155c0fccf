pub mod video;

pub use video::{Orientation, VideoRecord, VideoResponse};
