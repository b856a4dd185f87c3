//! Trait definitions for the executor module.

use async_trait::async_trait;
use serde::Serialize;

use super::error::EncodeError;
use crate::encode::EncodeSpec;

/// Summary of a successful encoder run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    /// Wall-clock time of the encoder process in milliseconds.
    pub duration_ms: u64,
    /// Diagnostic output captured from the encoder.
    pub diagnostics: String,
}

/// Runs an encode spec to completion.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Returns the name of this executor implementation.
    fn name(&self) -> &str;

    /// Runs the spec as a single encoder invocation.
    ///
    /// On `Ok`, every output described by the spec is complete.
    async fn execute(&self, spec: &EncodeSpec) -> Result<ExecutionReport, EncodeError>;

    /// Validates that the executor is properly configured and ready.
    async fn validate(&self) -> Result<(), EncodeError> {
        Ok(())
    }
}
