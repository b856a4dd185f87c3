//! FFprobe-based prober implementation.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::error::ProbeError;
use super::traits::Prober;
use crate::ladder::SourceResolution;

/// Reads width and height of the first video stream with `ffprobe`.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
}

impl FfprobeProber {
    /// Creates a prober that runs the given ffprobe binary.
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Creates a prober that resolves `ffprobe` from `PATH`.
    pub fn with_defaults() -> Self {
        Self::new("ffprobe")
    }

    /// Arguments selecting `v:0` and printing bare `width` and `height` lines.
    fn build_args(path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(path.as_os_str().to_owned());
        args
    }

    /// Parses the two-line `width\nheight` output.
    fn parse_probe_output(output: &str) -> Result<SourceResolution, ProbeError> {
        let mut values = output.lines().map(str::trim).filter(|l| !l.is_empty());

        let width = values
            .next()
            .ok_or_else(|| ProbeError::parse("no video stream reported"))?;
        let height = values
            .next()
            .ok_or_else(|| ProbeError::parse("missing height in probe output"))?;

        let width = width
            .parse::<u32>()
            .map_err(|e| ProbeError::parse(format!("invalid width {:?}: {}", width, e)))?;
        let height = height
            .parse::<u32>()
            .map_err(|e| ProbeError::parse(format!("invalid height {:?}: {}", height, e)))?;

        Ok(SourceResolution::new(width, height))
    }

    fn spawn_error(&self, e: std::io::Error) -> ProbeError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProbeError::FfprobeNotFound {
                path: self.ffprobe_path.clone(),
            }
        } else {
            ProbeError::Io(e)
        }
    }
}

#[async_trait]
impl Prober for FfprobeProber {
    fn name(&self) -> &str {
        "ffprobe"
    }

    async fn probe(&self, path: &Path) -> Result<SourceResolution, ProbeError> {
        if !path.exists() {
            return Err(ProbeError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.ffprobe_path)
            .args(Self::build_args(path))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let resolution = Self::parse_probe_output(&String::from_utf8_lossy(&output.stdout))?;
        debug!(path = %path.display(), %resolution, "Probed source resolution");
        Ok(resolution)
    }

    async fn validate(&self) -> Result<(), ProbeError> {
        let output = Command::new(&self.ffprobe_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
