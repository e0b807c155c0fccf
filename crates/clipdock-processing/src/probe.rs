//! Video geometry probing.
//!
//! Shells out to ffprobe for the first video stream's dimensions and
//! buckets them into an orientation. Only `width` and `height` are read
//! from the probe JSON; everything else ffprobe reports is ignored.

use std::path::Path;
use std::sync::Arc;

use clipdock_core::models::Orientation;

use crate::error::{IngestError, IngestResult, IngestStage};
use crate::runner::ToolRunner;

/// Pixel dimensions of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoDimensions {
    pub width: u64,
    pub height: u64,
}

pub struct VideoProber {
    runner: Arc<dyn ToolRunner>,
    ffprobe_path: String,
}

impl VideoProber {
    pub fn new(runner: Arc<dyn ToolRunner>, ffprobe_path: impl Into<String>) -> Self {
        Self {
            runner,
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Reads the dimensions of the first video stream in `input`.
    pub async fn dimensions(&self, input: &Path) -> IngestResult<VideoDimensions> {
        let args = vec![
            "-v".to_string(),
            "quiet".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_streams".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            input.display().to_string(),
        ];

        let output = self
            .runner
            .run(&self.ffprobe_path, &args)
            .await
            .map_err(|e| IngestError::from_tool_error(IngestStage::Classify, e))?;

        if !output.success() {
            return Err(IngestError::ExternalToolFailure {
                stage: IngestStage::Classify,
                exit_code: output.exit_code,
                stderr: output.stderr_lossy(),
            });
        }

        parse_dimensions(&output.stdout)
    }

    /// Probes `input` and buckets it by aspect ratio.
    pub async fn classify(&self, input: &Path) -> IngestResult<Orientation> {
        let dimensions = self.dimensions(input).await?;
        Ok(Orientation::from_dimensions(
            dimensions.width,
            dimensions.height,
        ))
    }
}

fn parse_dimensions(stdout: &[u8]) -> IngestResult<VideoDimensions> {
    let probe: serde_json::Value =
        serde_json::from_slice(stdout).map_err(|e| IngestError::MalformedProbeOutput {
            detail: format!("invalid JSON: {}", e),
        })?;

    let streams = probe
        .get("streams")
        .and_then(|streams| streams.as_array())
        .ok_or_else(|| IngestError::MalformedProbeOutput {
            detail: "missing streams array".to_string(),
        })?;

    let stream = streams
        .first()
        .ok_or_else(|| IngestError::MalformedProbeOutput {
            detail: "no video streams reported".to_string(),
        })?;

    let width = stream
        .get("width")
        .and_then(|width| width.as_u64())
        .ok_or_else(|| IngestError::MalformedProbeOutput {
            detail: "missing or non-numeric width".to_string(),
        })?;
    let height = stream
        .get("height")
        .and_then(|height| height.as_u64())
        .ok_or_else(|| IngestError::MalformedProbeOutput {
            detail: "missing or non-numeric height".to_string(),
        })?;

    Ok(VideoDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{ToolError, ToolOutput};
    use async_trait::async_trait;

    struct ScriptedProbe {
        exit_code: i32,
        stdout: &'static str,
        stderr: &'static str,
    }

    #[async_trait]
    impl ToolRunner for ScriptedProbe {
        async fn run(&self, _program: &str, _args: &[String]) -> Result<ToolOutput, ToolError> {
            Ok(ToolOutput {
                exit_code: Some(self.exit_code),
                stdout: self.stdout.as_bytes().to_vec(),
                stderr: self.stderr.as_bytes().to_vec(),
            })
        }
    }

    fn prober(script: ScriptedProbe) -> VideoProber {
        VideoProber::new(Arc::new(script), "ffprobe")
    }

    #[test]
    fn test_parse_standard_probe_output() {
        let json = br#"{"streams":[{"width":1920,"height":1080}]}"#;
        let dims = parse_dimensions(json).unwrap();
        assert_eq!(
            dims,
            VideoDimensions {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn test_parse_ignores_extra_fields_and_streams() {
        let json = br#"{
            "streams": [
                {"index":0,"codec_name":"h264","width":1280,"height":720,"pix_fmt":"yuv420p"},
                {"index":1,"codec_name":"h264","width":100,"height":100}
            ],
            "format": {"duration":"12.4"}
        }"#;
        let dims = parse_dimensions(json).unwrap();
        assert_eq!(dims.width, 1280);
        assert_eq!(dims.height, 720);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_dimensions(b"not json at all").unwrap_err();
        assert!(matches!(err, IngestError::MalformedProbeOutput { .. }));
    }

    #[test]
    fn test_parse_rejects_missing_streams() {
        let err = parse_dimensions(br#"{"format":{}}"#).unwrap_err();
        match err {
            IngestError::MalformedProbeOutput { detail } => {
                assert!(detail.contains("streams"));
            }
            other => panic!("expected MalformedProbeOutput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_zero_streams() {
        let err = parse_dimensions(br#"{"streams":[]}"#).unwrap_err();
        match err {
            IngestError::MalformedProbeOutput { detail } => {
                assert!(detail.contains("no video streams"));
            }
            other => panic!("expected MalformedProbeOutput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric_width() {
        let err =
            parse_dimensions(br#"{"streams":[{"width":"wide","height":1080}]}"#).unwrap_err();
        match err {
            IngestError::MalformedProbeOutput { detail } => {
                assert!(detail.contains("width"));
            }
            other => panic!("expected MalformedProbeOutput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_missing_height() {
        let err = parse_dimensions(br#"{"streams":[{"width":1920}]}"#).unwrap_err();
        match err {
            IngestError::MalformedProbeOutput { detail } => {
                assert!(detail.contains("height"));
            }
            other => panic!("expected MalformedProbeOutput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_classify_landscape() {
        let prober = prober(ScriptedProbe {
            exit_code: 0,
            stdout: r#"{"streams":[{"width":1920,"height":1080}]}"#,
            stderr: "",
        });
        let orientation = prober.classify(Path::new("/tmp/in.mp4")).await.unwrap();
        assert_eq!(orientation, Orientation::Landscape);
    }

    #[tokio::test]
    async fn test_classify_portrait() {
        let prober = prober(ScriptedProbe {
            exit_code: 0,
            stdout: r#"{"streams":[{"width":1080,"height":1920}]}"#,
            stderr: "",
        });
        let orientation = prober.classify(Path::new("/tmp/in.mp4")).await.unwrap();
        assert_eq!(orientation, Orientation::Portrait);
    }

    #[tokio::test]
    async fn test_probe_failure_surfaces_exit_code_and_stderr() {
        let prober = prober(ScriptedProbe {
            exit_code: 1,
            stdout: "",
            stderr: "Invalid data found when processing input\n",
        });
        let err = prober
            .classify(Path::new("/tmp/in.mp4"))
            .await
            .unwrap_err();
        match err {
            IngestError::ExternalToolFailure {
                stage,
                exit_code,
                stderr,
            } => {
                assert_eq!(stage, IngestStage::Classify);
                assert_eq!(exit_code, Some(1));
                assert_eq!(stderr, "Invalid data found when processing input");
            }
            other => panic!("expected ExternalToolFailure, got {:?}", other),
        }
    }
}
