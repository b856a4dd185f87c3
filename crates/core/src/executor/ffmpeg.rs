//! FFmpeg-based executor implementation.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use super::error::EncodeError;
use super::traits::{ExecutionReport, Executor};
use crate::encode::EncodeSpec;

/// Runs encode specs with the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegExecutor {
    ffmpeg_path: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegExecutor {
    /// Creates an executor for the given ffmpeg binary, with no time limit.
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout: None,
        }
    }

    /// Creates an executor that resolves `ffmpeg` from `PATH`.
    pub fn with_defaults() -> Self {
        Self::new("ffmpeg")
    }

    /// Kills the encoder if it runs longer than `timeout_secs`.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(timeout_secs));
        self
    }

    fn spawn_error(&self, e: std::io::Error) -> EncodeError {
        if e.kind() == std::io::ErrorKind::NotFound {
            EncodeError::FfmpegNotFound {
                path: self.ffmpeg_path.clone(),
            }
        } else {
            EncodeError::Io(e)
        }
    }
}

#[async_trait]
impl Executor for FfmpegExecutor {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn execute(&self, spec: &EncodeSpec) -> Result<ExecutionReport, EncodeError> {
        let start = Instant::now();
        let args = spec.to_args();
        debug!(program = %self.ffmpeg_path.display(), ?args, "Starting encoder");

        let mut child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let mut stderr = child.stderr.take();
        let run = async {
            let mut buf = Vec::new();
            if let Some(ref mut pipe) = stderr {
                pipe.read_to_end(&mut buf).await?;
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, buf))
        };

        let result = match self.timeout {
            Some(limit) => timeout(limit, run).await.ok(),
            None => Some(run.await),
        };

        let (status, stderr) = match result {
            Some(outcome) => outcome?,
            None => {
                let timeout_secs = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
                warn!(timeout_secs, "Encoder timed out, killing process");
                let _ = child.kill().await;
                return Err(EncodeError::Timeout { timeout_secs });
            }
        };

        let diagnostics = String::from_utf8_lossy(&stderr).trim().to_string();
        if !status.success() {
            return Err(EncodeError::failed(status.code(), diagnostics));
        }

        Ok(ExecutionReport {
            duration_ms: start.elapsed().as_millis() as u64,
            diagnostics,
        })
    }

    async fn validate(&self) -> Result<(), EncodeError> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(EncodeError::failed(
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{build, EncodeSettings};
    use crate::job::JobId;
    use crate::ladder::{resolve, Ladder, SourceResolution};
    use crate::planner::{JobPlanner, LayoutConfig};
    use std::path::Path;

    fn sample_spec() -> EncodeSpec {
        let plan = resolve(&Ladder::standard(), SourceResolution::new(854, 480)).unwrap();
        let layout = JobPlanner::new(LayoutConfig::new("/tmp/ladderline-test"))
            .layout(&JobId::new(), &plan);
        build(Path::new("/tmp/in.mp4"), &layout.tasks, &EncodeSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_execute_missing_binary() {
        let executor = FfmpegExecutor::new("/nonexistent/bin/ffmpeg");
        let err = executor.execute(&sample_spec()).await.unwrap_err();
        assert!(matches!(err, EncodeError::FfmpegNotFound { .. }));
    }

    #[tokio::test]
    async fn test_validate_missing_binary() {
        let executor = FfmpegExecutor::new("/nonexistent/bin/ffmpeg");
        assert!(matches!(
            executor.validate().await,
            Err(EncodeError::FfmpegNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_non_zero_exit_is_failure() {
        // `false` ignores its arguments and exits 1
        let executor = FfmpegExecutor::new("false");
        let err = executor.execute(&sample_spec()).await.unwrap_err();
        assert!(matches!(err, EncodeError::Failed { code: Some(1), .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_timeout_kills_encoder() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("slow-ffmpeg");
        std::fs::write(&script, "#!/bin/sh\nexec sleep 30\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let executor = FfmpegExecutor::new(&script).with_timeout(1);
        let start = Instant::now();
        let err = executor.execute(&sample_spec()).await.unwrap_err();

        assert!(matches!(err, EncodeError::Timeout { timeout_secs: 1 }));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_validate_checks_exit_status() {
        assert!(FfmpegExecutor::new("true").validate().await.is_ok());
        assert!(matches!(
            FfmpegExecutor::new("false").validate().await,
            Err(EncodeError::Failed { code: Some(1), .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_zero_exit_is_success() {
        let executor = FfmpegExecutor::new("true").with_timeout(30);
        let report = executor.execute(&sample_spec()).await.unwrap();
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_failed_error_keeps_diagnostics() {
        let err = EncodeError::failed(Some(1), "Unknown encoder 'libx264'");
        assert_eq!(err.diagnostics(), Some("Unknown encoder 'libx264'"));
        assert_eq!(EncodeError::Timeout { timeout_secs: 5 }.diagnostics(), None);
    }
}
