//! Prober module for measuring the native resolution of an uploaded video.
//!
//! The [`Prober`] trait is the seam the transcode pipeline depends on;
//! [`FfprobeProber`] implements it by shelling out to `ffprobe` and reading
//! the first video stream's width and height.

mod error;
mod ffprobe;
mod traits;

pub use error::ProbeError;
pub use ffprobe::FfprobeProber;
pub use traits::Prober;
