//! Core types for resolution ladders.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::error::LadderError;

/// A labelled output resolution, e.g. `720p` at 1280x720.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// Rendition label; also the output directory and filter-graph branch name.
    pub label: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            label: label.into(),
            width,
            height,
        }
    }

    /// Whether `other` fits inside this resolution in both dimensions.
    pub fn dominates(&self, other: &Resolution) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.label, self.width, self.height)
    }
}

/// Native resolution of an uploaded video, as reported by the prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceResolution {
    pub width: u32,
    pub height: u32,
}

impl SourceResolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the rung can be produced from this source without upscaling.
    pub fn dominates(&self, rung: &Resolution) -> bool {
        self.width >= rung.width && self.height >= rung.height
    }
}

impl fmt::Display for SourceResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An ordered, validated list of rungs, strictly ascending in both dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ladder {
    rungs: Vec<Resolution>,
}

impl Ladder {
    /// Builds a ladder, rejecting anything that would make dominance ambiguous.
    pub fn new(rungs: Vec<Resolution>) -> Result<Self, LadderError> {
        if rungs.is_empty() {
            return Err(LadderError::Empty);
        }

        let mut labels = HashSet::new();
        for rung in &rungs {
            if !is_valid_label(&rung.label) {
                return Err(LadderError::InvalidLabel {
                    label: rung.label.clone(),
                });
            }
            if rung.width == 0 || rung.height == 0 {
                return Err(LadderError::ZeroDimension {
                    label: rung.label.clone(),
                });
            }
            if !labels.insert(rung.label.as_str()) {
                return Err(LadderError::AmbiguousLabel {
                    label: rung.label.clone(),
                });
            }
        }

        // Scaled branches are named `v<label>`; no rung may shadow one.
        for rung in &rungs {
            if let Some(rest) = rung.label.strip_prefix('v') {
                if labels.contains(rest) {
                    return Err(LadderError::AmbiguousLabel {
                        label: rung.label.clone(),
                    });
                }
            }
        }

        for pair in rungs.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            if current.width <= previous.width || current.height <= previous.height {
                return Err(LadderError::NotMonotonic {
                    previous: previous.label.clone(),
                    current: current.label.clone(),
                });
            }
        }

        Ok(Self { rungs })
    }

    /// The default 320p / 480p / 720p / 1080p ladder.
    pub fn standard() -> Self {
        Self {
            rungs: vec![
                Resolution::new("320p", 512, 320),
                Resolution::new("480p", 854, 480),
                Resolution::new("720p", 1280, 720),
                Resolution::new("1080p", 1920, 1080),
            ],
        }
    }

    pub fn rungs(&self) -> &[Resolution] {
        &self.rungs
    }

    /// The smallest rung. Ladders are never empty.
    pub fn lowest(&self) -> &Resolution {
        &self.rungs[0]
    }

    /// The largest rung.
    pub fn highest(&self) -> &Resolution {
        &self.rungs[self.rungs.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.rungs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rungs.is_empty()
    }
}

impl Default for Ladder {
    fn default() -> Self {
        Self::standard()
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// The rungs selected for one job, in ladder order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionPlan {
    entries: Vec<Resolution>,
}

impl ResolutionPlan {
    pub(super) fn new(entries: Vec<Resolution>) -> Self {
        debug_assert!(!entries.is_empty());
        Self { entries }
    }

    pub fn entries(&self) -> &[Resolution] {
        &self.entries
    }

    /// The best rung the source supports.
    pub fn highest(&self) -> &Resolution {
        &self.entries[self.entries.len() - 1]
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resolution> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ResolutionPlan {
    type Item = &'a Resolution;
    type IntoIter = std::slice::Iter<'a, Resolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
