//! Types for the job module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

use crate::ladder::SourceResolution;

/// Opaque, process-unique job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Uploaded,
    Probed,
    Planned,
    DirectoriesReady,
    SpecBuilt,
    Executing,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Uploaded => "uploaded",
            JobState::Probed => "probed",
            JobState::Planned => "planned",
            JobState::DirectoriesReady => "directories_ready",
            JobState::SpecBuilt => "spec_built",
            JobState::Executing => "executing",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a successful job produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOutcome {
    pub job_id: JobId,
    /// `<base>/<jobId>`, where the rendition directories can be reached.
    pub base_url: String,
    /// Local job directory holding one subdirectory per rendition.
    pub job_dir: PathBuf,
    /// Rendition labels in ascending ladder order.
    pub renditions: Vec<String>,
    /// Probed source resolution.
    pub source: SourceResolution,
    pub completed_at: DateTime<Utc>,
    /// Total time from probe to encoder exit.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_round_trips_through_display() {
        let id = JobId::new();
        let parsed: JobId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_job_ids_are_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }

    #[test]
    fn test_job_id_rejects_garbage() {
        assert!("../etc".parse::<JobId>().is_err());
    }

    #[test]
    fn test_job_id_serializes_as_plain_string() {
        let id: JobId = "7f1c2a9e-0d4b-4c55-9a51-1f0f8f3e2b11".parse().unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"7f1c2a9e-0d4b-4c55-9a51-1f0f8f3e2b11\""
        );
    }

    #[test]
    fn test_state_display() {
        assert_eq!(JobState::DirectoriesReady.to_string(), "directories_ready");
    }
}
