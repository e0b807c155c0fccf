//! External tool execution.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;

/// Captured result of a finished tool process. Both output streams are
/// fully buffered; nothing is streamed while the tool runs.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// None when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },
}

/// Runs external media tools. The seam lets tests script tool behavior
/// without ffmpeg installed.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput, ToolError>;
}

/// Spawns the real binaries.
pub struct SystemToolRunner {
    timeout: Duration,
}

impl SystemToolRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolRunner for SystemToolRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        // kill_on_drop reaps the child when the timeout drops the future
        let output = tokio::time::timeout(
            self.timeout,
            Command::new(program).args(args).kill_on_drop(true).output(),
        )
        .await
        .map_err(|_| ToolError::TimedOut {
            program: program.to_string(),
            timeout: self.timeout,
        })?
        .map_err(|source| ToolError::Spawn {
            program: program.to_string(),
            source,
        })?;

        tracing::debug!(
            program,
            exit_code = ?output.status.code(),
            duration_ms = start.elapsed().as_millis() as u64,
            "external tool finished"
        );

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn runner() -> SystemToolRunner {
        SystemToolRunner::new(Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_captures_both_output_streams() {
        let args = vec![
            "-c".to_string(),
            "echo to-stdout; echo to-stderr >&2".to_string(),
        ];
        let output = runner().run("sh", &args).await.unwrap();
        assert!(output.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "to-stdout");
        assert_eq!(output.stderr_lossy(), "to-stderr");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported_not_an_error() {
        let args = vec!["-c".to_string(), "exit 3".to_string()];
        let output = runner().run("sh", &args).await.unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, Some(3));
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_spawn_error() {
        let err = runner()
            .run("clipdock-no-such-binary", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_slow_tool_times_out() {
        let runner = SystemToolRunner::new(Duration::from_millis(100));
        let args = vec!["5".to_string()];
        let err = runner.run("sleep", &args).await.unwrap_err();
        assert!(matches!(err, ToolError::TimedOut { .. }));
    }
}
