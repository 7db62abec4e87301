/*!
 * Tests for the minimum duration enforcer
 */

use ocrsub::pipeline::DurationEnforcer;
use crate::common::{self, cue};

#[test]
fn test_enforce_withLastCue_shouldGetFullMinimum() {
    let mut cues = common::collection(vec![cue(5_000, 5_100, "last")]);

    DurationEnforcer::new(1_000).enforce(&mut cues);

    assert_eq!(cues.get(0).unwrap().end.source, 6_000);
}

#[test]
fn test_enforce_withDistantNextCue_shouldUseMinimum() {
    let mut cues = common::collection(vec![cue(0, 200, "a"), cue(5_000, 7_000, "b")]);

    let extended = DurationEnforcer::new(1_000).enforce(&mut cues);

    assert_eq!(extended, 1);
    assert_eq!(common::timeline(&cues), vec![
        (0, 1_000, "a".to_string()),
        (5_000, 7_000, "b".to_string()),
    ]);
}

#[test]
fn test_enforce_withLongCues_shouldNotShorten() {
    let mut cues = common::collection(vec![cue(0, 3_000, "long"), cue(100, 150, "overlapping")]);

    DurationEnforcer::new(1_000).enforce(&mut cues);

    assert_eq!(cues.get(0).unwrap().end.source, 3_000);
    assert_eq!(cues.get(1).unwrap().end.source, 1_100);
}

#[test]
fn test_enforce_withNextStartInsideShortCue_shouldKeepOriginalEnd() {
    // next starts before this cue ends: never shorten
    let mut cues = common::collection(vec![cue(0, 500, "a"), cue(300, 2_000, "b")]);

    DurationEnforcer::new(1_000).enforce(&mut cues);

    assert_eq!(cues.get(0).unwrap().end.source, 500);
}

#[test]
fn test_enforce_withHugeMinimum_shouldSaturateInsteadOfOverflowing() {
    let mut cues = common::collection(vec![cue(5, 10, "forever")]);

    let extended = DurationEnforcer::new(u64::MAX).enforce(&mut cues);

    assert_eq!(extended, 1);
    assert_eq!(cues.get(0).unwrap().end.source, u64::MAX);
}

#[test]
fn test_enforce_shouldGuaranteeFloorOrNextStart() {
    let minimum = 1_000;
    let mut cues = common::collection(vec![
        cue(0, 10, "a"),
        cue(400, 500, "b"),
        cue(3_000, 3_001, "c"),
        cue(3_700, 5_000, "d"),
        cue(9_000, 9_000, "e"),
    ]);

    DurationEnforcer::new(minimum).enforce(&mut cues);

    let all: Vec<_> = cues.cues().cloned().collect();
    for (i, cue) in all.iter().enumerate() {
        let floor = match all.get(i + 1) {
            Some(next) => minimum.min(next.start.source - cue.start.source),
            None => minimum,
        };
        assert!(cue.duration_ms() >= floor, "cue {} lasts {}ms, floor {}ms", i, cue.duration_ms(), floor);
        assert!(cue.end >= cue.start);
    }
}
