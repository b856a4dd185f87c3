use std::path::Path;
use std::sync::Arc;
use ladderline_core::{Config, TranscodePipeline};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: Arc<TranscodePipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: Arc<TranscodePipeline>) -> Self {
        Self { config, pipeline }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> Arc<TranscodePipeline> {
        Arc::clone(&self.pipeline)
    }

    /// Directory receiving raw uploads; also the root served at `/uploads`.
    pub fn uploads_dir(&self) -> &Path {
        &self.config.storage.uploads_dir
    }
}
