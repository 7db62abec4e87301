use log::{debug, info};

use crate::cues::{Cue, CueCollection};

/// Joins simultaneous cues shown in different screen areas into one
/// two-line cue, upper text first
#[derive(Debug, Clone, Copy, Default)]
pub struct CueStacker;

impl CueStacker {
    pub fn new() -> Self {
        Self
    }

    /// True when the two cues sit one above the other and are on screen at
    /// the same time
    pub fn should_stack(current: &Cue, next: &Cue) -> bool {
        let disjoint = current.region.is_above(&next.region) || next.region.is_above(&current.region);
        disjoint && current.overlaps(next)
    }

    /// Stack adjacent cues in place, returning how many were folded away
    pub fn stack(&self, cues: &mut CueCollection) -> usize {
        let mut stacked = 0;
        let mut index = 0;

        while let Some((current, next)) = cues.pair_mut(index) {
            if Self::should_stack(current, next) {
                debug!("Stacking '{}' with '{}'", current.text, next.text);
                fold(current, next);
                cues.remove(index + 1);
                stacked += 1;
            } else {
                index += 1;
            }
        }

        info!("Stacked {} cues", stacked);
        stacked
    }
}

/// The folded cue keeps `current`'s region, so later simultaneous lines are
/// still tested against the first one
fn fold(current: &mut Cue, next: &Cue) {
    current.text = if current.region.is_above(&next.region) {
        format!("{}\n{}", current.text, next.text)
    } else {
        format!("{}\n{}", next.text, current.text)
    };
    current.end = current.end.max(next.end);
    current.confidence = current.confidence.max(next.confidence);
}
