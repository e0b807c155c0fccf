//! Errors produced by the ingest pipeline.
//!
//! Every variant is terminal for its upload; the pipeline never retries.
//! `IngestError::stage` names where the pipeline stopped, which feeds both
//! logs and error payloads.

use std::fmt;

use clipdock_storage::StorageError;
use uuid::Uuid;

use crate::runner::ToolError;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Validate,
    Stage,
    Classify,
    Rewrite,
    Upload,
    Record,
}

impl IngestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestStage::Validate => "validate",
            IngestStage::Stage => "stage",
            IngestStage::Classify => "classify",
            IngestStage::Rewrite => "rewrite",
            IngestStage::Upload => "upload",
            IngestStage::Record => "record",
        }
    }
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "killed before exiting".to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unsupported media type: {declared}")]
    UnsupportedMediaType { declared: String },

    #[error("payload of {size_bytes} bytes exceeds the {max_bytes} byte ceiling")]
    PayloadTooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("{stage} tool failed ({}): {stderr}", exit_code_label(.exit_code))]
    ExternalToolFailure {
        stage: IngestStage,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("{stage} tool timed out after {timeout_secs}s")]
    ToolTimeout { stage: IngestStage, timeout_secs: u64 },

    #[error("malformed probe output: {detail}")]
    MalformedProbeOutput { detail: String },

    #[error("upload failure: {0}")]
    UploadFailure(#[from] StorageError),

    #[error("video record {id} not found")]
    RecordNotFound { id: Uuid },

    #[error("video record {id} is owned by another user")]
    OwnershipMismatch { id: Uuid },

    #[error("record store failure: {0}")]
    RecordStore(#[source] anyhow::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// The stage at which the pipeline stopped.
    pub fn stage(&self) -> IngestStage {
        match self {
            IngestError::UnsupportedMediaType { .. }
            | IngestError::PayloadTooLarge { .. }
            | IngestError::RecordNotFound { .. }
            | IngestError::OwnershipMismatch { .. } => IngestStage::Validate,
            IngestError::Io(_) => IngestStage::Stage,
            IngestError::MalformedProbeOutput { .. } => IngestStage::Classify,
            IngestError::ExternalToolFailure { stage, .. }
            | IngestError::ToolTimeout { stage, .. } => *stage,
            IngestError::UploadFailure(_) => IngestStage::Upload,
            IngestError::RecordStore(_) => IngestStage::Record,
        }
    }

    pub(crate) fn from_tool_error(stage: IngestStage, err: ToolError) -> Self {
        match err {
            ToolError::Spawn { source, .. } => IngestError::Io(source),
            ToolError::TimedOut { timeout, .. } => IngestError::ToolTimeout {
                stage,
                timeout_secs: timeout.as_secs(),
            },
        }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;
