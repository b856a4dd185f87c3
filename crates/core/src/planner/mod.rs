//! Planner module for laying out a job's output directories.
//!
//! Turns a [`ResolutionPlan`](crate::ladder::ResolutionPlan) into one
//! [`TranscodeTask`] per rendition and creates the matching
//! `<root>/<jobId>/<label>/` directories before any encoding starts.

mod error;
mod fs_planner;
mod types;

pub use error::PlanningError;
pub use fs_planner::JobPlanner;
pub use types::{JobLayout, LayoutConfig, TranscodeTask, SEGMENT_INDEX_PATTERN};
