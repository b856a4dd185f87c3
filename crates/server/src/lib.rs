//! HTTP front end for the ladderline transcode core.
//!
//! Receives uploads, runs each one through the transcode pipeline on its own
//! task, and serves the resulting renditions read-only under `/uploads`.

pub mod api;
pub mod metrics;
pub mod state;
