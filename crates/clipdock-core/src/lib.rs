//! Shared types for the Clipdock video service.
//!
//! This crate holds the configuration loader, the application error type,
//! and the data models that the storage, processing, db, and api crates
//! build on. It contains no I/O beyond reading environment variables.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{Orientation, VideoRecord, VideoResponse};
pub use storage_types::StorageBackend;
