//! Resolution ladder and source-resolution matching.
//!
//! A [`Ladder`] is the fixed, ascending list of renditions the service knows
//! how to produce. [`resolve`] picks the prefix of the ladder a given source
//! can feed without upscaling.
//!
//! # Example
//!
//! ```
//! use ladderline_core::ladder::{resolve, Ladder, SourceResolution};
//!
//! let plan = resolve(&Ladder::standard(), SourceResolution::new(1280, 720)).unwrap();
//! assert_eq!(plan.labels(), vec!["320p", "480p", "720p"]);
//! ```

mod error;
mod resolver;
mod types;

pub use error::LadderError;
pub use resolver::resolve;
pub use types::{Ladder, Resolution, ResolutionPlan, SourceResolution};
