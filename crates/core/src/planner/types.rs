//! Types for the planner module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::job::JobId;
use crate::ladder::Resolution;

/// Segment file stem with a zero-padded index starting at 0 (`segment000`, `segment001`, ...).
pub const SEGMENT_INDEX_PATTERN: &str = "segment%03d";

/// Where and how rendition artifacts are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Root under which each job gets its own directory.
    pub output_root: PathBuf,
    /// Manifest extension, e.g. `m3u8`.
    pub manifest_extension: String,
    /// Segment extension, e.g. `ts`.
    pub segment_extension: String,
}

impl LayoutConfig {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            manifest_extension: "m3u8".to_string(),
            segment_extension: "ts".to_string(),
        }
    }

    /// `<root>/<jobId>`
    pub fn job_dir(&self, job_id: &JobId) -> PathBuf {
        self.output_root.join(job_id.to_string())
    }
}

/// One rendition to produce: derived from a plan entry, consumed by the encode builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscodeTask {
    /// Rung label (`720p`).
    pub label: String,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// `<root>/<jobId>/<label>`
    pub output_dir: PathBuf,
    /// `<output_dir>/<label>.<manifest-ext>`
    pub manifest_path: PathBuf,
    /// `<output_dir>/segment%03d.<segment-ext>`
    pub segment_pattern: PathBuf,
}

impl TranscodeTask {
    pub(super) fn for_rung(job_dir: &Path, rung: &Resolution, config: &LayoutConfig) -> Self {
        let output_dir = job_dir.join(&rung.label);
        let manifest_path =
            output_dir.join(format!("{}.{}", rung.label, config.manifest_extension));
        let segment_pattern =
            output_dir.join(format!("{}.{}", SEGMENT_INDEX_PATTERN, config.segment_extension));

        Self {
            label: rung.label.clone(),
            width: rung.width,
            height: rung.height,
            output_dir,
            manifest_path,
            segment_pattern,
        }
    }
}

/// The on-disk layout of one job, tasks in ascending ladder order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobLayout {
    pub job_id: JobId,
    /// `<root>/<jobId>`
    pub job_dir: PathBuf,
    pub tasks: Vec<TranscodeTask>,
}

impl JobLayout {
    pub fn labels(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.label.as_str()).collect()
    }
}
