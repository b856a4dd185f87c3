//! Job identity, lifecycle and the end-to-end transcode pipeline.
//!
//! A job moves linearly through
//! `Uploaded → Probed → Planned → DirectoriesReady → SpecBuilt → Executing`
//! and ends in `Succeeded` or `Failed`. Any stage failure ends the job with a
//! [`TranscodeError`] tagged with the failing stage.

mod error;
mod pipeline;
mod types;

pub use error::{EncodeResult, TranscodeError};
pub use pipeline::TranscodePipeline;
pub use types::{JobId, JobOutcome, JobState};
