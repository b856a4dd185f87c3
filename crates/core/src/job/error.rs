//! Error types for the job module.

use thiserror::Error;

use super::types::JobOutcome;
use crate::executor::EncodeError;
use crate::ladder::LadderError;
use crate::planner::PlanningError;
use crate::prober::ProbeError;

/// Why a job failed, tagged by the stage that failed.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Probe failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("{0}")]
    UnsupportedResolution(#[from] LadderError),

    #[error("Planning failed: {0}")]
    Planning(#[from] PlanningError),

    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),
}

impl TranscodeError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            TranscodeError::Probe(_) => "probe",
            TranscodeError::UnsupportedResolution(_) => "resolve",
            TranscodeError::Planning(_) => "plan",
            TranscodeError::Encode(_) => "encode",
        }
    }

    /// Whether the caller can fix this by uploading a different file.
    pub fn is_client_error(&self) -> bool {
        match self {
            TranscodeError::UnsupportedResolution(e) => e.is_client_error(),
            _ => false,
        }
    }

    /// Diagnostic text for the caller: encoder output when captured, the error message otherwise.
    pub fn detail(&self) -> String {
        match self {
            TranscodeError::Encode(e) => e
                .diagnostics()
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string()),
            TranscodeError::Probe(ProbeError::Failed { stderr, .. }) if !stderr.is_empty() => {
                stderr.clone()
            }
            other => other.to_string(),
        }
    }
}

/// `Ok` carries the artifact base URL, `Err` the tagged failure.
pub type EncodeResult = Result<JobOutcome, TranscodeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder::{Resolution, SourceResolution};

    fn unsupported() -> TranscodeError {
        LadderError::UnsupportedResolution {
            found: SourceResolution::new(200, 100),
            lowest: Resolution::new("320p", 512, 320),
        }
        .into()
    }

    #[test]
    fn test_stage_tags() {
        assert_eq!(unsupported().stage(), "resolve");
        assert_eq!(TranscodeError::from(ProbeError::parse("empty")).stage(), "probe");
        assert_eq!(
            TranscodeError::from(PlanningError::EmptyTaskList).stage(),
            "plan"
        );
        assert_eq!(
            TranscodeError::from(EncodeError::Timeout { timeout_secs: 1 }).stage(),
            "encode"
        );
    }

    #[test]
    fn test_only_unsupported_resolution_is_client_error() {
        assert!(unsupported().is_client_error());
        assert!(!TranscodeError::from(LadderError::Empty).is_client_error());
        assert!(!TranscodeError::from(ProbeError::parse("empty")).is_client_error());
        assert!(!TranscodeError::from(EncodeError::failed(Some(1), "boom")).is_client_error());
    }

    #[test]
    fn test_detail_prefers_encoder_output() {
        let err = TranscodeError::from(EncodeError::failed(Some(1), "Unknown encoder"));
        assert_eq!(err.detail(), "Unknown encoder");

        let err = TranscodeError::from(EncodeError::failed(Some(1), ""));
        assert_eq!(err.detail(), "Encoder exited with code Some(1)");
    }

    #[test]
    fn test_unsupported_message_names_both_resolutions() {
        let message = unsupported().to_string();
        assert!(message.contains("200x100"));
        assert!(message.contains("320p"));
    }
}
