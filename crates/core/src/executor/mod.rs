//! Executor module for running an [`EncodeSpec`](crate::encode::EncodeSpec).
//!
//! The [`Executor`] trait hides process spawning from the pipeline so the
//! orchestration can be tested without an encoder installed.
//! [`FfmpegExecutor`] runs the spec as a single `ffmpeg` process.

mod error;
mod ffmpeg;
mod traits;

pub use error::EncodeError;
pub use ffmpeg::FfmpegExecutor;
pub use traits::{ExecutionReport, Executor};
