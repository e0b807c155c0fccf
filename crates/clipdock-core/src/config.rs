//! Application configuration loaded from environment variables.
//!
//! Every setting has a default suitable for local development except the
//! secrets and backend credentials, which `validate` checks before the
//! server starts serving traffic.

use std::env;
use std::path::PathBuf;

use anyhow::bail;

use crate::storage_types::StorageBackend;

/// Hard ceiling on a single video upload: 1 GiB.
pub const DEFAULT_MAX_VIDEO_SIZE_BYTES: u64 = 1 << 30;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "postgresql://localhost:5432/clipdock";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 120;
const DEFAULT_THUMBNAIL_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_base_url: Option<String>,
    /// Directory where uploads are staged before processing.
    pub scratch_dir: PathBuf,
    pub max_video_size_bytes: u64,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub tool_timeout_secs: u64,
    pub thumbnail_cache_capacity: usize,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Reads configuration from the process environment, falling back to
    /// defaults. A `.env` file is honored when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            storage_backend: env::var("STORAGE_BACKEND")
                .unwrap_or_else(|_| "s3".to_string())
                .parse()
                .unwrap_or(StorageBackend::S3),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").or_else(|_| env::var("AWS_REGION")).ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_base_url: env::var("LOCAL_BASE_URL").ok(),
            scratch_dir: env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_VIDEO_SIZE_BYTES.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_VIDEO_SIZE_BYTES),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            tool_timeout_secs: env::var("TOOL_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TOOL_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_TOOL_TIMEOUT_SECS),
            thumbnail_cache_capacity: env::var("THUMBNAIL_CACHE_CAPACITY")
                .unwrap_or_else(|_| DEFAULT_THUMBNAIL_CACHE_CAPACITY.to_string())
                .parse()
                .unwrap_or(DEFAULT_THUMBNAIL_CACHE_CAPACITY),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Checks settings that would otherwise fail at an awkward time, like
    /// the first upload. Called once at startup.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret.len() < 32 {
            bail!("JWT_SECRET must be set and at least 32 characters long");
        }
        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            bail!("DATABASE_URL must be a postgresql:// connection string");
        }
        if self.max_video_size_bytes == 0 {
            bail!("MAX_VIDEO_SIZE_BYTES must be greater than zero");
        }
        if self.tool_timeout_secs == 0 {
            bail!("TOOL_TIMEOUT_SECS must be greater than zero");
        }
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    bail!("S3_BUCKET is required when STORAGE_BACKEND=s3");
                }
                if self.s3_region.is_none() {
                    bail!("S3_REGION or AWS_REGION is required when STORAGE_BACKEND=s3");
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    bail!("LOCAL_STORAGE_PATH is required when STORAGE_BACKEND=local");
                }
                if self.local_base_url.is_none() {
                    bail!("LOCAL_BASE_URL is required when STORAGE_BACKEND=local");
                }
            }
        }
        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            storage_backend: StorageBackend::S3,
            s3_bucket: Some("clipdock-test".to_string()),
            s3_region: Some("us-east-1".to_string()),
            s3_endpoint: None,
            local_storage_path: None,
            local_base_url: None,
            scratch_dir: std::env::temp_dir(),
            max_video_size_bytes: DEFAULT_MAX_VIDEO_SIZE_BYTES,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            thumbnail_cache_capacity: DEFAULT_THUMBNAIL_CACHE_CAPACITY,
            cors_origins: Vec::new(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut config = valid_config();
        config.jwt_secret = "too-short".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_s3_backend_requires_bucket() {
        let mut config = valid_config();
        config.s3_bucket = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn test_local_backend_requires_path_and_base_url() {
        let mut config = valid_config();
        config.storage_backend = StorageBackend::Local;
        assert!(config.validate().is_err());

        config.local_storage_path = Some("/var/lib/clipdock".to_string());
        config.local_base_url = Some("http://localhost:8080/files".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_postgres_database_url_rejected() {
        let mut config = valid_config();
        config.database_url = "mysql://localhost/clipdock".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_default_size_ceiling_is_one_gibibyte() {
        assert_eq!(DEFAULT_MAX_VIDEO_SIZE_BYTES, 1_073_741_824);
    }
}
