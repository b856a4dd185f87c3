//! File system job planner.

use tracing::debug;

use super::error::PlanningError;
use super::types::{JobLayout, LayoutConfig, TranscodeTask};
use crate::job::JobId;
use crate::ladder::ResolutionPlan;

/// Creates per-job, per-rendition output directories.
#[derive(Debug, Clone)]
pub struct JobPlanner {
    config: LayoutConfig,
}

impl JobPlanner {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Computes the layout without touching the file system.
    pub fn layout(&self, job_id: &JobId, plan: &ResolutionPlan) -> JobLayout {
        let job_dir = self.config.job_dir(job_id);
        let tasks = plan
            .iter()
            .map(|rung| TranscodeTask::for_rung(&job_dir, rung, &self.config))
            .collect();

        JobLayout {
            job_id: job_id.clone(),
            job_dir,
            tasks,
        }
    }

    /// Computes the layout and creates one directory per task.
    ///
    /// Directories that already exist are accepted; any other failure aborts
    /// the job before encoding.
    pub async fn plan(
        &self,
        job_id: &JobId,
        plan: &ResolutionPlan,
    ) -> Result<JobLayout, PlanningError> {
        let layout = self.layout(job_id, plan);

        for task in &layout.tasks {
            tokio::fs::create_dir_all(&task.output_dir)
                .await
                .map_err(|e| PlanningError::DirectoryCreationFailed {
                    path: task.output_dir.clone(),
                    source: e,
                })?;
            debug!(job_id = %job_id, dir = %task.output_dir.display(), "Created rendition directory");
        }

        Ok(layout)
    }
}
