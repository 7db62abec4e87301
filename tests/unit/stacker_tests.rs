/*!
 * Tests for the cue stacker
 */

use ocrsub::cues::{BoundingRegion, Cue};
use ocrsub::pipeline::CueStacker;
use crate::common::{self, bottom_region, top_region};

#[test]
fn test_stack_withIdenticalIntervals_shouldPutUpperTextFirst() {
    // lower cue arrives first in key order
    let mut cues = common::collection(vec![
        Cue::new(1_000, 2_000, "bottom line", bottom_region(), 0.9),
        Cue::new(1_000, 2_000, "top line", top_region(), 0.9),
    ]);

    let stacked = CueStacker::new().stack(&mut cues);

    assert_eq!(stacked, 1);
    assert_eq!(cues.len(), 1);
    let merged = cues.get(0).unwrap();
    assert_eq!(merged.text, "top line\nbottom line");
    assert_eq!(merged.start.source, 1_000);
    assert_eq!(merged.end.source, 2_000);
    // the folded cue keeps the region of the cue it started from
    assert_eq!(merged.region, bottom_region());
}

#[test]
fn test_stack_withOverlappingIntervals_shouldExtendToLaterEnd() {
    let mut cues = common::collection(vec![
        Cue::new(0, 1_500, "upper", top_region(), 0.9),
        Cue::new(1_000, 3_000, "lower", bottom_region(), 0.9),
    ]);

    CueStacker::new().stack(&mut cues);

    assert_eq!(common::timeline(&cues), vec![(0, 3_000, "upper\nlower".to_string())]);
}

#[test]
fn test_stack_withDisjointIntervals_shouldLeaveCuesAlone() {
    let mut cues = common::collection(vec![
        Cue::new(0, 1_000, "upper", top_region(), 0.9),
        Cue::new(1_500, 3_000, "lower", bottom_region(), 0.9),
    ]);

    assert_eq!(CueStacker::new().stack(&mut cues), 0);
    assert_eq!(cues.len(), 2);
}

#[test]
fn test_stack_withSameScreenArea_shouldNotStack() {
    let mut cues = common::collection(vec![
        Cue::new(0, 1_000, "one", bottom_region(), 0.9),
        Cue::new(500, 1_500, "two", bottom_region(), 0.9),
    ]);

    assert_eq!(CueStacker::new().stack(&mut cues), 0);
}

#[test]
fn test_stack_withThreeSimultaneousLines_shouldFoldAllIntoOneCue() {
    let middle = BoundingRegion::from_edges(0.2, 0.45, 0.8, 0.55);
    let mut cues = common::collection(vec![
        Cue::new(0, 1_000, "top", top_region(), 0.9),
        Cue::new(0, 1_000, "bottom", bottom_region(), 0.9),
        Cue::new(200, 900, "elsewhere", middle, 0.9),
    ]);

    let stacked = CueStacker::new().stack(&mut cues);

    // the same index is retested against the new successor
    assert_eq!(stacked, 2);
    assert_eq!(common::timeline(&cues), vec![(0, 1_000, "top\nbottom\nelsewhere".to_string())]);
    assert_eq!(cues.get(0).unwrap().region, top_region());
}
