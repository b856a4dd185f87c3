//! Error types for the ladder module.

use thiserror::Error;

use super::types::{Resolution, SourceResolution};

/// Errors raised while building a ladder or resolving a source against it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LadderError {
    /// The ladder has no rungs.
    #[error("Ladder must contain at least one rung")]
    Empty,

    /// A rung has a zero dimension.
    #[error("Rung {label} has a zero dimension")]
    ZeroDimension { label: String },

    /// A rung label cannot be used as a directory or filter-graph label.
    #[error("Rung label {label:?} must be non-empty and contain only [A-Za-z0-9_-]")]
    InvalidLabel { label: String },

    /// Two rungs share a label, or one label collides with another's scaled branch label.
    #[error("Rung label {label:?} is ambiguous")]
    AmbiguousLabel { label: String },

    /// A rung does not grow in both dimensions over its predecessor.
    #[error("Rung {current} must be strictly larger than {previous} in both width and height")]
    NotMonotonic { previous: String, current: String },

    /// The source cannot feed even the lowest rung.
    #[error("Source resolution {found} is below the lowest ladder rung {lowest}")]
    UnsupportedResolution {
        found: SourceResolution,
        lowest: Resolution,
    },
}

impl LadderError {
    /// Whether the caller can fix this by uploading a different file.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnsupportedResolution { .. })
    }
}
