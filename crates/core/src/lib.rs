//! Adaptive-bitrate transcode core.
//!
//! Given an uploaded video, [`TranscodePipeline`] probes its native
//! resolution, picks the ladder rungs it can feed without upscaling, creates
//! one output directory per rung and runs a single one-decode, many-output
//! encoder job that writes an HLS rendition into each directory.

pub mod config;
pub mod encode;
pub mod executor;
pub mod job;
pub mod ladder;
pub mod metrics;
pub mod planner;
pub mod prober;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, EncoderConfig,
    ServerConfig, StorageConfig,
};
pub use encode::{build, EncodeSettings, EncodeSpec};
pub use executor::{EncodeError, ExecutionReport, Executor, FfmpegExecutor};
pub use job::{EncodeResult, JobId, JobOutcome, JobState, TranscodeError, TranscodePipeline};
pub use ladder::{resolve, Ladder, LadderError, Resolution, ResolutionPlan, SourceResolution};
pub use planner::{JobLayout, JobPlanner, LayoutConfig, PlanningError, TranscodeTask};
pub use prober::{FfprobeProber, ProbeError, Prober};
