/*!
 * Tests for the cue merger
 */

use ocrsub::app_config::FixSubtitlesConfig;
use ocrsub::pipeline::{CueMerger, MergeReason};
use crate::common::{self, cue, cue_with_confidence};

fn partial_merger(percentage: u32) -> CueMerger {
    CueMerger::new(&FixSubtitlesConfig {
        partial_match: true,
        partial_match_percentage: percentage,
        ..FixSubtitlesConfig::default()
    })
}

#[test]
fn test_merge_withExactDuplicates_shouldCollapse() {
    common::init_logging();
    let mut cues = common::collection(vec![
        cue(0, 500, "hello"),
        cue(500, 900, "hello"),
        cue(900, 1_300, "world"),
    ]);

    let stats = CueMerger::new(&FixSubtitlesConfig::default()).merge(&mut cues);

    assert_eq!(stats.exact, 1);
    assert_eq!(common::timeline(&cues), vec![
        (0, 900, "hello".to_string()),
        (900, 1_300, "world".to_string()),
    ]);
}

#[test]
fn test_merge_withLongRun_shouldCollapseIntoOne() {
    let mut cues = common::collection((0..10).map(|i| cue(i * 100, i * 100 + 100, "same")).collect());

    let stats = CueMerger::new(&FixSubtitlesConfig::default()).merge(&mut cues);

    assert_eq!(stats.total(), 9);
    assert_eq!(common::timeline(&cues), vec![(0, 1_000, "same".to_string())]);
}

#[test]
fn test_partial_match_atBoundary_shouldUseStrictThreshold() {
    // "the cat sat" vs "the cat ran": 2 of 3 tokens, 66.67%
    assert_eq!(partial_merger(66).match_reason("the cat sat", "the cat ran"), Some(MergeReason::Partial));
    assert_eq!(partial_merger(67).match_reason("the cat sat", "the cat ran"), None);

    let mut cues = common::collection(vec![cue(0, 500, "the cat sat"), cue(500, 900, "the cat ran")]);
    partial_merger(67).merge(&mut cues);
    assert_eq!(cues.len(), 2);
}

#[test]
fn test_partial_match_shouldIgnoreCase() {
    assert_eq!(partial_merger(60).match_reason("The Cat Sat", "the cat sat down"), Some(MergeReason::Partial));
}

#[test]
fn test_partial_match_withEmptyCurrent_shouldNeverMatch() {
    assert_eq!(partial_merger(0).match_reason("   ", "anything"), None);
}

#[test]
fn test_whitespace_match_shouldMergeSpacingVariants() {
    let merger = CueMerger::new(&FixSubtitlesConfig::default());
    assert_eq!(merger.match_reason("안녕 하세요", "안녕하세요"), Some(MergeReason::Whitespace));
    assert_eq!(merger.match_reason("a b", "ab c"), None);
}

#[test]
fn test_whitespace_match_shouldOnlyIgnoreSpaces() {
    let merger = CueMerger::new(&FixSubtitlesConfig::default());
    assert_eq!(merger.match_reason("hello\tthere", "hellothere"), None);
    assert_eq!(merger.match_reason("two\nlines", "twolines"), None);
    assert_eq!(merger.match_reason(" hello there ", "hellothere"), Some(MergeReason::Whitespace));
}

#[test]
fn test_merge_shouldTakeTextFromMoreConfidentCue() {
    let merger = CueMerger::new(&FixSubtitlesConfig::default());

    let mut cues = common::collection(vec![
        cue_with_confidence(0, 500, "hel lo", 0.85),
        cue_with_confidence(500, 900, "hello", 0.99),
    ]);
    merger.merge(&mut cues);
    let merged = cues.get(0).unwrap();
    assert_eq!(merged.text, "hello");
    assert_eq!(merged.confidence, 0.99);

    // ties keep the earlier text
    let mut cues = common::collection(vec![
        cue_with_confidence(0, 500, "hel lo", 0.9),
        cue_with_confidence(500, 900, "hello", 0.9),
    ]);
    merger.merge(&mut cues);
    assert_eq!(cues.get(0).unwrap().text, "hel lo");
}

#[test]
fn test_merge_shouldBeIdempotent() {
    let merger = partial_merger(50);
    let mut cues = common::collection(vec![
        cue(0, 300, "good morning everyone"),
        cue(300, 600, "good morning"),
        cue(600, 900, "Good Morning Everyone"),
        cue(900, 1_200, "see you"),
        cue(1_200, 1_500, "see  you"),
        cue(1_500, 1_800, "bye"),
    ]);

    merger.merge(&mut cues);
    let once = cues.clone();
    let second = merger.merge(&mut cues);

    assert_eq!(second.total(), 0);
    assert_eq!(cues, once);
}

#[test]
fn test_merge_shouldPreserveOrderAndEndAfterStart() {
    let merger = partial_merger(50);
    let mut cues = common::collection(vec![
        cue(2_000, 2_500, "c"),
        cue(0, 400, "a"),
        cue(400, 800, "a"),
        cue(1_000, 1_500, "b"),
    ]);

    merger.merge(&mut cues);

    let starts: Vec<u64> = cues.cues().map(|c| c.start.source).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
    assert!(cues.cues().all(|c| c.end >= c.start));
}
