//! Video ingest pipeline.
//!
//! An upload travels through five steps: stage to a scratch file, classify
//! orientation with ffprobe, rewrite for fast-start playback with ffmpeg,
//! upload the rewritten file to object storage, and update the video
//! record. `IngestOrchestrator` drives the steps; the individual pieces
//! are exposed for reuse and for tests.

pub mod error;
pub mod faststart;
pub mod ingest;
pub mod probe;
pub mod runner;
pub mod scratch;

pub use error::{IngestError, IngestResult, IngestStage};
pub use faststart::FastStartRewriter;
pub use ingest::{
    IngestConfig, IngestOrchestrator, RecordStore, UploadRequest, ALLOWED_MEDIA_TYPE,
};
pub use probe::{VideoDimensions, VideoProber};
pub use runner::{SystemToolRunner, ToolError, ToolOutput, ToolRunner};
pub use scratch::ScratchFile;
