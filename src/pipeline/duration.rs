use log::{debug, info};

use crate::cues::CueCollection;
use crate::timecode::Timecode;

/// Stretches cues that flash by too quickly
#[derive(Debug, Clone, Copy)]
pub struct DurationEnforcer {
    minimum_ms: u64,
}

impl DurationEnforcer {
    pub fn new(minimum_ms: u64) -> Self {
        Self { minimum_ms }
    }

    /// Extend short cues to the minimum, or up to the next cue's start if
    /// that comes sooner. One forward pass; cues are never shortened.
    /// Returns the number of cues extended.
    pub fn enforce(&self, cues: &mut CueCollection) -> usize {
        let mut extended = 0;

        for index in 0..cues.len() {
            let next_start = cues.get(index + 1).map(|next| next.start.source);
            let Some(cue) = cues.get_mut(index) else { break };

            if cue.duration_ms() >= self.minimum_ms {
                continue;
            }

            let start = cue.start.source;
            let length = match next_start {
                Some(next) if next.saturating_sub(start) < self.minimum_ms => next.saturating_sub(start),
                _ => self.minimum_ms,
            };

            let new_end = cue.end.source.max(start.saturating_add(length));
            if new_end != cue.end.source {
                debug!("Extending '{}' from {} to {}", cue.text, cue.end, Timecode::from_milliseconds(new_end));
                cue.end = Timecode::from_milliseconds(new_end);
                extended += 1;
            }
        }

        info!("Extended {} cues to a minimum of {}ms", extended, self.minimum_ms);
        extended
    }
}
