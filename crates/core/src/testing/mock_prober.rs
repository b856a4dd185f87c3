//! Mock prober for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ladder::SourceResolution;
use crate::prober::{ProbeError, Prober};

/// Mock implementation of the Prober trait.
///
/// Returns a configured resolution, optionally per path, and records every
/// probed path.
#[derive(Debug)]
pub struct MockProber {
    /// Paths probed so far.
    probed: Arc<RwLock<Vec<PathBuf>>>,
    /// Pre-configured resolutions by path.
    resolutions: Arc<RwLock<HashMap<PathBuf, SourceResolution>>>,
    /// Resolution reported for paths without a specific entry.
    default_resolution: SourceResolution,
    /// If set, the next probe will fail with this error.
    next_error: Arc<RwLock<Option<ProbeError>>>,
}

impl Default for MockProber {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProber {
    /// Create a mock prober reporting 1920x1080 for every file.
    pub fn new() -> Self {
        Self::returning(SourceResolution::new(1920, 1080))
    }

    /// Create a mock prober reporting `resolution` for every file.
    pub fn returning(resolution: SourceResolution) -> Self {
        Self {
            probed: Arc::new(RwLock::new(Vec::new())),
            resolutions: Arc::new(RwLock::new(HashMap::new())),
            default_resolution: resolution,
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a mock prober whose first probe fails with `error`.
    pub fn failing(error: ProbeError) -> Self {
        let mut prober = Self::new();
        prober.next_error = Arc::new(RwLock::new(Some(error)));
        prober
    }

    /// Set the resolution reported for a specific path.
    pub async fn set_resolution(&self, path: impl AsRef<Path>, resolution: SourceResolution) {
        self.resolutions
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), resolution);
    }

    /// Configure the next probe to fail with the given error.
    pub async fn set_next_error(&self, error: ProbeError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all probed paths.
    pub async fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.read().await.clone()
    }
}

#[async_trait]
impl Prober for MockProber {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<SourceResolution, ProbeError> {
        self.probed.write().await.push(path.to_path_buf());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        if let Some(resolution) = self.resolutions.read().await.get(path) {
            return Ok(*resolution);
        }
        Ok(self.default_resolution)
    }
}
