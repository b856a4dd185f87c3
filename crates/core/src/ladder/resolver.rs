//! Matches a probed source against the ladder.

use super::error::LadderError;
use super::types::{Ladder, ResolutionPlan, SourceResolution};

/// Computes which rungs to produce for `source`.
///
/// Picks the highest rung the source dominates, then returns every rung that
/// rung dominates, in ladder order. Never upscales and never invents a rung
/// above the top of the ladder.
///
/// # Errors
///
/// Returns [`LadderError::UnsupportedResolution`] when the source is smaller
/// than the lowest rung in either dimension.
pub fn resolve(ladder: &Ladder, source: SourceResolution) -> Result<ResolutionPlan, LadderError> {
    let highest = ladder
        .rungs()
        .iter()
        .filter(|rung| source.dominates(rung))
        .last()
        .ok_or_else(|| LadderError::UnsupportedResolution {
            found: source,
            lowest: ladder.lowest().clone(),
        })?;

    let entries = ladder
        .rungs()
        .iter()
        .filter(|rung| highest.dominates(rung))
        .cloned()
        .collect();

    Ok(ResolutionPlan::new(entries))
}
