//! Error types for the planner module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while laying out a job or building its encode spec.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Failed to create a rendition output directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An encode job was requested with no outputs.
    #[error("Cannot build an encode job with no transcode tasks")]
    EmptyTaskList,
}
