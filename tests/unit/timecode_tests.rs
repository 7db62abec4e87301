/*!
 * Tests for millisecond timecodes
 */

use ocrsub::timecode::Timecode;

#[test]
fn test_from_milliseconds_withMixedUnits_shouldDecompose() {
    let timecode = Timecode::from_milliseconds(3_661_005);

    assert_eq!(timecode.hours, 1);
    assert_eq!(timecode.minutes, 1);
    assert_eq!(timecode.seconds, 1);
    assert_eq!(timecode.milliseconds, 5);
    assert_eq!(timecode.to_display_string(), "01:01:01.500");
}

#[test]
fn test_from_milliseconds_shouldPreserveSourceInvariant() {
    for ms in [0u64, 1, 999, 1_000, 59_999, 60_000, 3_599_999, 3_600_000, 90_061_001, 360_000_123] {
        let t = Timecode::from_milliseconds(ms);
        assert_eq!(t.hours * 3_600_000 + t.minutes * 60_000 + t.seconds * 1_000 + t.milliseconds, t.source);
        assert!(t.minutes < 60 && t.seconds < 60 && t.milliseconds < 1_000);
        assert_eq!(Timecode::from_parts(t.hours, t.minutes, t.seconds, t.milliseconds), t);
    }
}

#[test]
fn test_to_display_string_withMillisecondPadding_shouldPadOnTheRight() {
    assert_eq!(Timecode::from_milliseconds(0).to_display_string(), "00:00:00.000");
    assert_eq!(Timecode::from_milliseconds(50).to_display_string(), "00:00:00.500");
    assert_eq!(Timecode::from_milliseconds(123).to_display_string(), "00:00:00.123");
    assert_eq!(Timecode::from_milliseconds(12_340).to_display_string(), "00:00:12.340");
}
