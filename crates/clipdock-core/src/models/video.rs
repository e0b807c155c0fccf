//! Video record model and orientation classification.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Coarse aspect-ratio bucket for an uploaded video.
///
/// The bucket becomes the first path segment of the storage key, so
/// `Display` must stay lowercase and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Classifies pixel dimensions into an orientation bucket.
    ///
    /// A video counts as landscape when `floor(width / height * 9) == 16`
    /// and as portrait when `floor(width / height * 16) == 9`; anything else
    /// is `Other`. The floor comparison keeps near-16:9 encodes such as
    /// 1366x768 in the same bucket as exact ones. Landscape is checked
    /// first, so a frame matching both rules counts as landscape.
    pub fn from_dimensions(width: u64, height: u64) -> Self {
        let ratio = width as f64 / height as f64;
        if (ratio * 9.0) as i64 == 16 {
            Orientation::Landscape
        } else if (ratio * 16.0) as i64 == 9 {
            Orientation::Portrait
        } else {
            Orientation::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row in the `videos` table.
///
/// `storage_url` and `thumbnail_url` are null until the corresponding
/// upload completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub storage_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API representation of a video. Omits `owner_id`; ownership is implied
/// by the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub storage_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VideoRecord> for VideoResponse {
    fn from(record: VideoRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            storage_url: record.storage_url,
            thumbnail_url: record.thumbnail_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
