//! Encode module for describing a single multi-output encoder invocation.
//!
//! Instead of one encoder run per rendition, an [`EncodeSpec`] decodes the
//! source once, splits the video into one branch per task, scales each branch
//! and writes each to its own segmented HLS output:
//!
//! ```text
//! [0:v]split=2[320p][480p];[320p]scale=512:320[v320p];[480p]scale=854:480[v480p]
//! -map [v320p] ... 320p/320p.m3u8
//! -map [v480p] ... 480p/480p.m3u8
//! ```
//!
//! The spec is plain data. It is rendered to an argument vector with
//! [`EncodeSpec::to_args`] and never passes through a shell.

mod builder;
mod types;

pub use builder::build;
pub use types::{Branch, EncodeSettings, EncodeSpec, OutputMap, ScaleStage, SplitStage};
