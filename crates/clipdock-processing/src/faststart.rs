//! Fast-start MP4 rewrite.
//!
//! Remuxes an MP4 so its index atoms sit at the front of the file, which
//! lets playback begin before the download completes. Streams are copied,
//! not re-encoded, and source metadata is carried over. The input file is
//! never modified; output goes to a sibling path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{IngestError, IngestResult, IngestStage};
use crate::runner::ToolRunner;

pub struct FastStartRewriter {
    runner: Arc<dyn ToolRunner>,
    ffmpeg_path: String,
}

impl FastStartRewriter {
    pub fn new(runner: Arc<dyn ToolRunner>, ffmpeg_path: impl Into<String>) -> Self {
        Self {
            runner,
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Where the rewritten file for `input` lands: `<input>.processed.mp4`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let mut name = input.as_os_str().to_os_string();
        name.push(".processed.mp4");
        PathBuf::from(name)
    }

    /// Rewrites `input` and returns the path of the new file.
    pub async fn rewrite(&self, input: &Path) -> IngestResult<PathBuf> {
        let output_path = self.output_path(input);
        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            input.display().to_string(),
            "-map_metadata".to_string(),
            "0".to_string(),
            "-codec".to_string(),
            "copy".to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
            "-f".to_string(),
            "mp4".to_string(),
            output_path.display().to_string(),
        ];

        let output = self
            .runner
            .run(&self.ffmpeg_path, &args)
            .await
            .map_err(|e| IngestError::from_tool_error(IngestStage::Rewrite, e))?;

        if !output.success() {
            return Err(IngestError::ExternalToolFailure {
                stage: IngestStage::Rewrite,
                exit_code: output.exit_code,
                stderr: output.stderr_lossy(),
            });
        }

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{ToolError, ToolOutput};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingRunner {
        exit_code: i32,
        stderr: &'static str,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl RecordingRunner {
        fn succeeding() -> Self {
            Self {
                exit_code: 0,
                stderr: "",
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ToolRunner for RecordingRunner {
        async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput, ToolError> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok(ToolOutput {
                exit_code: Some(self.exit_code),
                stdout: Vec::new(),
                stderr: self.stderr.as_bytes().to_vec(),
            })
        }
    }

    #[test]
    fn test_output_path_is_a_sibling_of_the_input() {
        let runner = Arc::new(RecordingRunner::succeeding());
        let rewriter = FastStartRewriter::new(runner, "ffmpeg");
        assert_eq!(
            rewriter.output_path(Path::new("/tmp/scratch/ingest-ab12.mp4")),
            PathBuf::from("/tmp/scratch/ingest-ab12.mp4.processed.mp4")
        );
    }

    #[tokio::test]
    async fn test_rewrite_invokes_ffmpeg_with_copy_and_faststart_flags() {
        let runner = Arc::new(RecordingRunner::succeeding());
        let rewriter = FastStartRewriter::new(runner.clone(), "ffmpeg");

        let out = rewriter.rewrite(Path::new("/tmp/in.mp4")).await.unwrap();
        assert_eq!(out, PathBuf::from("/tmp/in.mp4.processed.mp4"));

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (program, args) = &calls[0];
        assert_eq!(program, "ffmpeg");

        // input follows -i, output is the final argument
        let input_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input_pos + 1], "/tmp/in.mp4");
        assert_eq!(args.last().unwrap(), "/tmp/in.mp4.processed.mp4");

        for window in [
            ["-map_metadata", "0"],
            ["-codec", "copy"],
            ["-movflags", "+faststart"],
            ["-f", "mp4"],
        ] {
            let pos = args
                .iter()
                .position(|a| a == window[0])
                .unwrap_or_else(|| panic!("missing flag {}", window[0]));
            assert_eq!(args[pos + 1], window[1]);
        }
    }

    #[tokio::test]
    async fn test_rewrite_failure_reports_rewrite_stage() {
        let runner = Arc::new(RecordingRunner {
            exit_code: 1,
            stderr: "moov atom not found\n",
            calls: Mutex::new(Vec::new()),
        });
        let rewriter = FastStartRewriter::new(runner, "ffmpeg");

        let err = rewriter.rewrite(Path::new("/tmp/in.mp4")).await.unwrap_err();
        match err {
            IngestError::ExternalToolFailure {
                stage,
                exit_code,
                stderr,
            } => {
                assert_eq!(stage, IngestStage::Rewrite);
                assert_eq!(exit_code, Some(1));
                assert_eq!(stderr, "moov atom not found");
            }
            other => panic!("expected ExternalToolFailure, got {:?}", other),
        }
    }
}
