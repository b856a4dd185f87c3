//! End-to-end transcode pipeline: probe, resolve, plan, build, execute.

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use super::error::EncodeResult;
use super::types::{JobId, JobOutcome, JobState};
use crate::config::{Config, ConfigError};
use crate::encode::{build, EncodeSettings};
use crate::executor::{Executor, FfmpegExecutor};
use crate::ladder::{resolve, Ladder};
use crate::metrics;
use crate::planner::{JobPlanner, LayoutConfig};
use crate::prober::{FfprobeProber, Prober};

/// Runs jobs from an uploaded file to a finished rendition set.
///
/// Stages of one job run strictly in sequence. Separate jobs share nothing
/// but the encoder semaphore, so callers may run many `process` calls
/// concurrently.
pub struct TranscodePipeline {
    prober: Arc<dyn Prober>,
    executor: Arc<dyn Executor>,
    ladder: Ladder,
    planner: JobPlanner,
    settings: EncodeSettings,
    base_url: String,
    encode_slots: Arc<Semaphore>,
}

impl TranscodePipeline {
    /// Creates a pipeline with default encoder settings and no limit on
    /// concurrent encodes.
    ///
    /// The artifact base URL defaults to the output root path.
    pub fn new(
        prober: Arc<dyn Prober>,
        executor: Arc<dyn Executor>,
        ladder: Ladder,
        layout: LayoutConfig,
    ) -> Self {
        let base_url = layout.output_root.display().to_string();
        Self {
            prober,
            executor,
            ladder,
            planner: JobPlanner::new(layout),
            settings: EncodeSettings::default(),
            base_url,
            encode_slots: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
        }
    }

    /// Builds a pipeline backed by `ffprobe` and `ffmpeg` from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut executor = FfmpegExecutor::new(&config.encoder.ffmpeg_path);
        if let Some(timeout_secs) = config.encoder.timeout_secs {
            executor = executor.with_timeout(timeout_secs);
        }

        Ok(Self::new(
            Arc::new(FfprobeProber::new(&config.encoder.ffprobe_path)),
            Arc::new(executor),
            config.ladder()?,
            config.layout_config(),
        )
        .with_settings(config.encode_settings())
        .with_max_concurrent_encodes(config.encoder.max_concurrent_jobs))
    }

    pub fn with_settings(mut self, settings: EncodeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the prefix under which `<jobId>` directories are published.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Limits how many encoder processes may run at once. Zero is treated as one.
    pub fn with_max_concurrent_encodes(mut self, limit: usize) -> Self {
        self.encode_slots = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        self.planner.config()
    }

    pub fn prober(&self) -> &Arc<dyn Prober> {
        &self.prober
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    /// Checks that the external tools can be started. Failures are logged, not fatal.
    pub async fn validate_tools(&self) -> bool {
        let mut ok = true;
        if let Err(e) = self.prober.validate().await {
            warn!(prober = self.prober.name(), error = %e, "Prober is not usable");
            ok = false;
        }
        if let Err(e) = self.executor.validate().await {
            warn!(executor = self.executor.name(), error = %e, "Executor is not usable");
            ok = false;
        }
        ok
    }

    /// Runs one job to completion.
    ///
    /// Rejection by the resolver happens before any directory is created.
    pub async fn process(&self, input: &Path, job_id: &JobId) -> EncodeResult {
        let started = Instant::now();
        let result = self.run(input, job_id, started).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(outcome) => {
                metrics::record_success(elapsed, outcome.renditions.len());
                info!(
                    job_id = %job_id,
                    state = %JobState::Succeeded,
                    base_url = %outcome.base_url,
                    renditions = ?outcome.renditions,
                    duration_ms = outcome.duration_ms,
                    "Job finished"
                );
            }
            Err(e) => {
                metrics::record_failure(elapsed, e);
                if e.is_client_error() {
                    warn!(job_id = %job_id, state = %JobState::Failed, stage = e.stage(), error = %e, "Job rejected");
                } else {
                    error!(job_id = %job_id, state = %JobState::Failed, stage = e.stage(), error = %e, "Job failed");
                }
            }
        }

        result
    }

    async fn run(&self, input: &Path, job_id: &JobId, started: Instant) -> EncodeResult {
        info!(job_id = %job_id, state = %JobState::Uploaded, input = %input.display(), "Job accepted");

        let source = self.prober.probe(input).await?;
        info!(job_id = %job_id, state = %JobState::Probed, source = %source, "Probed source");

        let plan = resolve(&self.ladder, source)?;
        info!(job_id = %job_id, state = %JobState::Planned, renditions = ?plan.labels(), "Resolved ladder");

        let layout = self.planner.plan(job_id, &plan).await?;
        info!(
            job_id = %job_id,
            state = %JobState::DirectoriesReady,
            job_dir = %layout.job_dir.display(),
            "Created output directories"
        );

        let spec = build(input, &layout.tasks, &self.settings)?;
        info!(job_id = %job_id, state = %JobState::SpecBuilt, branches = spec.branches().len(), "Built encode spec");

        let report = {
            // Never closed; a closed semaphore would only lift the limit.
            let _permit = self.encode_slots.acquire().await.ok();
            info!(job_id = %job_id, state = %JobState::Executing, executor = self.executor.name(), "Encoding");
            self.executor.execute(&spec).await?
        };
        debug!(job_id = %job_id, encoder_ms = report.duration_ms, "Encoder finished");

        Ok(JobOutcome {
            job_id: job_id.clone(),
            base_url: format!("{}/{}", self.base_url, job_id),
            job_dir: layout.job_dir,
            renditions: layout.tasks.into_iter().map(|task| task.label).collect(),
            source,
            completed_at: Utc::now(),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}
