//! Mock executor for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::fixtures::hls_manifest;
use crate::encode::{Branch, EncodeSpec};
use crate::executor::{EncodeError, ExecutionReport, Executor};

/// A recorded execution for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedExecution {
    /// The spec that was submitted.
    pub spec: EncodeSpec,
    /// Whether the execution succeeded.
    pub success: bool,
}

/// Mock implementation of the Executor trait.
///
/// On success it writes what the real encoder would leave behind: one
/// manifest and `segment000` per branch, into the branch's output directory.
/// Like ffmpeg, it does not create that directory.
#[derive(Debug)]
pub struct MockExecutor {
    /// Recorded executions.
    executions: Arc<RwLock<Vec<RecordedExecution>>>,
    /// If set, the next execution will fail with this error.
    next_error: Arc<RwLock<Option<EncodeError>>>,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        Self {
            executions: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all recorded executions.
    pub async fn recorded_executions(&self) -> Vec<RecordedExecution> {
        self.executions.read().await.clone()
    }

    /// Get the specs of all recorded executions.
    pub async fn executed_specs(&self) -> Vec<EncodeSpec> {
        self.executions
            .read()
            .await
            .iter()
            .map(|e| e.spec.clone())
            .collect()
    }

    /// Get the number of executions performed.
    pub async fn execution_count(&self) -> usize {
        self.executions.read().await.len()
    }

    /// Configure the next execution to fail with the given error.
    pub async fn set_next_error(&self, error: EncodeError) {
        *self.next_error.write().await = Some(error);
    }

    async fn write_branch(branch: &Branch, segment_duration_secs: u32) -> std::io::Result<()> {
        let segment = first_segment_path(&branch.segment_pattern);
        tokio::fs::write(&segment, b"").await?;

        let segment_name = segment
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let manifest = hls_manifest(&[segment_name], segment_duration_secs);
        tokio::fs::write(&branch.manifest_path, manifest).await
    }
}

/// `.../segment%03d.ts` → `.../segment000.ts`
fn first_segment_path(pattern: &Path) -> PathBuf {
    let file_name = pattern
        .file_name()
        .map(|n| n.to_string_lossy().replace("%03d", "000"))
        .unwrap_or_default();
    pattern.with_file_name(file_name)
}

#[async_trait]
impl Executor for MockExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, spec: &EncodeSpec) -> Result<ExecutionReport, EncodeError> {
        if let Some(error) = self.next_error.write().await.take() {
            self.executions.write().await.push(RecordedExecution {
                spec: spec.clone(),
                success: false,
            });
            return Err(error);
        }

        for branch in spec.branches() {
            Self::write_branch(branch, spec.settings().segment_duration_secs).await?;
        }

        self.executions.write().await.push(RecordedExecution {
            spec: spec.clone(),
            success: true,
        });

        Ok(ExecutionReport {
            duration_ms: 0,
            diagnostics: String::new(),
        })
    }
}
