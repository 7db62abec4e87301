use log::{debug, info};

use crate::app_config::FixSubtitlesConfig;
use crate::cues::{Cue, CueCollection};

/// Which rule made two texts equivalent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeReason {
    Exact,
    Whitespace,
    Partial,
}

/// Merges per reason for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub exact: usize,
    pub whitespace: usize,
    pub partial: usize,
}

impl MergeStats {
    pub fn total(&self) -> usize {
        self.exact + self.whitespace + self.partial
    }

    fn record(&mut self, reason: MergeReason) {
        match reason {
            MergeReason::Exact => self.exact += 1,
            MergeReason::Whitespace => self.whitespace += 1,
            MergeReason::Partial => self.partial += 1,
        }
    }
}

/// Collapses consecutive cues that show the same text
#[derive(Debug, Clone)]
pub struct CueMerger {
    ignore_whitespace: bool,
    partial_match: bool,
    partial_match_percentage: u32,
}

impl CueMerger {
    pub fn new(config: &FixSubtitlesConfig) -> Self {
        Self {
            ignore_whitespace: config.ignore_whitespace,
            partial_match: config.partial_match,
            partial_match_percentage: config.partial_match_percentage,
        }
    }

    /// Decide whether `next` repeats `current`. Rules are tried in order:
    /// exact, space-insensitive, token overlap.
    pub fn match_reason(&self, current: &str, next: &str) -> Option<MergeReason> {
        if current == next {
            return Some(MergeReason::Exact);
        }

        if self.ignore_whitespace && strip_spaces(current) == strip_spaces(next) {
            return Some(MergeReason::Whitespace);
        }

        if self.partial_match && token_match_percentage(current, next) > f64::from(self.partial_match_percentage) {
            return Some(MergeReason::Partial);
        }

        None
    }

    /// Merge adjacent equivalent cues in place. After a merge the same
    /// position is examined again against its new successor.
    pub fn merge(&self, cues: &mut CueCollection) -> MergeStats {
        let mut stats = MergeStats::default();
        let mut index = 0;

        while let Some((current, next)) = cues.pair_mut(index) {
            match self.match_reason(&current.text, &next.text) {
                Some(reason) => {
                    debug!("Merging '{}' into '{}' ({:?})", next.text, current.text, reason);
                    absorb(current, next);
                    cues.remove(index + 1);
                    stats.record(reason);
                }
                None => index += 1,
            }
        }

        info!(
            "Merged {} cues (exact: {}, whitespace: {}, partial: {})",
            stats.total(), stats.exact, stats.whitespace, stats.partial
        );
        stats
    }
}

/// `current` keeps its start and takes the successor's end; the text of the
/// more confident cue wins, ties keep `current`
fn absorb(current: &mut Cue, next: &Cue) {
    current.end = next.end;
    if next.confidence > current.confidence {
        current.text = next.text.clone();
    }
    current.confidence = current.confidence.max(next.confidence);
}

/// Only the ASCII space is removed; tabs and newlines still count
fn strip_spaces(text: &str) -> String {
    text.replace(' ', "")
}

/// Share of `current`'s tokens found in `next`, in percent.
///
/// Each token of `current` consumes the first unconsumed case-insensitively
/// equal token of `next`. An empty `current` scores 0.
pub fn token_match_percentage(current: &str, next: &str) -> f64 {
    let current_tokens: Vec<String> = current.split_whitespace().map(str::to_lowercase).collect();
    if current_tokens.is_empty() {
        return 0.0;
    }

    let next_tokens: Vec<String> = next.split_whitespace().map(str::to_lowercase).collect();
    let mut consumed = vec![false; next_tokens.len()];
    let mut matched = 0usize;

    for token in &current_tokens {
        let hit = next_tokens
            .iter()
            .enumerate()
            .find(|(i, candidate)| !consumed[*i] && *candidate == token)
            .map(|(i, _)| i);
        if let Some(i) = hit {
            consumed[i] = true;
            matched += 1;
        }
    }

    matched as f64 / current_tokens.len() as f64 * 100.0
}
