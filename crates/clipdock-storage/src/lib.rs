//! Object storage backends for processed videos.
//!
//! The `Storage` trait hides whether bytes land in S3 or on the local
//! filesystem; `keys` composes the durable object keys and `factory` picks
//! the backend from configuration. Backends are feature-gated so a
//! deployment can compile out what it does not use.

pub mod factory;
pub mod keys;
pub mod traits;

#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;

pub use factory::create_storage;
pub use traits::{Storage, StorageError, StorageResult};

#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
