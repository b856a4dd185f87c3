//! Trait definitions for the prober module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ProbeError;
use crate::ladder::SourceResolution;

/// Something that can report a video's native resolution.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Returns the name of this prober implementation.
    fn name(&self) -> &str;

    /// Measures the first video stream of the file at `path`.
    async fn probe(&self, path: &Path) -> Result<SourceResolution, ProbeError>;

    /// Validates that the prober is properly configured and ready.
    async fn validate(&self) -> Result<(), ProbeError> {
        Ok(())
    }
}
