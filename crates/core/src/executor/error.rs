//! Error types for the executor module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the external encoder.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// The encoder exited unsuccessfully.
    #[error("Encoder exited with code {code:?}")]
    Failed {
        code: Option<i32>,
        /// Captured diagnostic output.
        stderr: String,
    },

    /// The encoder ran past the configured limit and was killed.
    #[error("Encoder timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while running the encoder.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncodeError {
    /// Creates a new failure error from an exit code and captured stderr.
    pub fn failed(code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::Failed {
            code,
            stderr: stderr.into(),
        }
    }

    /// Diagnostic text from the encoder, when any was captured.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Failed { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}
