//! Error types for the prober module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent the source resolution from being determined.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// FFprobe exited unsuccessfully.
    #[error("FFprobe exited with code {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    /// FFprobe output did not contain a width and a height.
    #[error("Failed to parse probe output: {reason}")]
    Parse { reason: String },

    /// I/O error while running the probe.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// Creates a new parse error.
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}
