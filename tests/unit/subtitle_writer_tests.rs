/*!
 * Tests for subtitle rendering
 */

use std::str::FromStr;

use ocrsub::errors::SubtitleError;
use ocrsub::subtitle_writer::{SubtitleFormat, SubtitleWriter};
use crate::common::{self, cue};

#[test]
fn test_render_webvtt_shouldMatchExactLayout() {
    let cues = common::collection(vec![cue(0, 1_000, "hello"), cue(61_000, 62_500, "two\nlines")]);

    let rendered = SubtitleWriter::render_webvtt(&cues);

    assert_eq!(
        rendered,
        "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nhello\n\n00:01:01.000 --> 00:01:02.500\ntwo\nlines\n"
    );
}

#[test]
fn test_render_webvtt_withNoCues_shouldOnlyWriteHeader() {
    let cues = common::collection(vec![]);
    assert_eq!(SubtitleWriter::render_webvtt(&cues), "WEBVTT\n");
}

#[test]
fn test_render_webvtt_withSmallMilliseconds_shouldPadOnTheRight() {
    let cues = common::collection(vec![cue(5, 1_050, "x")]);
    assert!(SubtitleWriter::render_webvtt(&cues).contains("00:00:00.500 --> 00:00:01.500"));
}

#[test]
fn test_render_srt_shouldNumberCuesFromOne() {
    let cues = common::collection(vec![cue(0, 1_000, "first"), cue(2_000, 3_250, "second")]);

    let rendered = SubtitleWriter::render(&cues, SubtitleFormat::Srt);

    assert_eq!(
        rendered,
        "1\n00:00:00,000 --> 00:00:01,000\nfirst\n\n2\n00:00:02,000 --> 00:00:03,250\nsecond\n\n"
    );
}

#[test]
fn test_write_to_file_shouldCreateParentDirectories() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("nested").join("out.vtt");
    let cues = common::collection(vec![cue(0, 1_000, "hello")]);

    SubtitleWriter::write_to_file(&cues, SubtitleFormat::Vtt, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("WEBVTT\n\n"));
}

#[test]
fn test_write_to_file_withUnwritableParent_shouldReportWriteError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let blocker = common::create_test_file(temp_dir.path(), "blocker", "not a directory").unwrap();
    let cues = common::collection(vec![cue(0, 1_000, "hello")]);

    let err = SubtitleWriter::write_to_file(&cues, SubtitleFormat::Vtt, blocker.join("out.vtt")).unwrap_err();

    assert!(matches!(err.downcast_ref::<SubtitleError>(), Some(SubtitleError::Write(_))));
}

#[test]
fn test_subtitle_format_fromStr_shouldAcceptCommonSpellings() {
    assert_eq!(SubtitleFormat::from_str("VTT").unwrap(), SubtitleFormat::Vtt);
    assert_eq!(SubtitleFormat::from_str("webvtt").unwrap(), SubtitleFormat::Vtt);
    assert_eq!(SubtitleFormat::from_str(".srt").unwrap(), SubtitleFormat::Srt);
    assert!(SubtitleFormat::from_str("ass").is_err());
    assert_eq!(SubtitleFormat::Srt.extension(), "srt");
}
