/*!
 * End-to-end consolidation tests, from saved annotation JSON to subtitle text
 */

use ocrsub::app_config::Config;
use ocrsub::cues::Cue;
use ocrsub::detection::annotation::parse_annotation_json;
use ocrsub::detection::{RawDetection, WhatlangDetector};
use ocrsub::pipeline::{Pipeline, TranslationStage};
use ocrsub::providers::mock::MockTranslator;
use ocrsub::subtitle_writer::{SubtitleFormat, SubtitleWriter};
use crate::common::{self, bottom_region, top_region, SAMPLE_ANNOTATION};

fn sample_detections() -> Vec<RawDetection> {
    parse_annotation_json(SAMPLE_ANNOTATION).unwrap().into_detections()
}

#[test]
fn test_consolidate_withSampleAnnotation_shouldProduceCleanWebVtt() {
    common::init_logging();
    let pipeline = Pipeline::new(&common::test_config(), Box::new(WhatlangDetector));

    let (cues, report) = pipeline.consolidate(sample_detections());

    assert_eq!(report.detections, 4);
    assert_eq!(report.filter.retained, 3);
    assert_eq!(report.filter.low_confidence, 1);
    assert_eq!(report.merge.exact, 1);
    assert_eq!(report.extended, 1);
    assert_eq!(report.cues, 2);
    assert_eq!(
        SubtitleWriter::render(&cues, SubtitleFormat::Vtt),
        "WEBVTT\n\n00:00:01.000 --> 00:00:02.200\nhello there\n\n00:00:03.000 --> 00:00:04.000\ngeneral kenobi\n"
    );
}

#[test]
fn test_consolidate_withLowThreshold_shouldStackTopSign() {
    let mut config = Config::default();
    config.detection.confidence = 50.0;
    let pipeline = Pipeline::new(&config, Box::new(WhatlangDetector));

    let (cues, report) = pipeline.consolidate(sample_detections());

    // EXIT spans 0-10s and sits above every subtitle
    assert_eq!(report.stacked, 2);
    assert_eq!(common::timeline(&cues), vec![
        (0, 10_000, "EXIT\nhello there\ngeneral kenobi".to_string()),
    ]);
}

#[test]
fn test_consolidate_withFixDisabled_shouldKeepDuplicates() {
    let mut config = Config::default();
    config.fix_subtitles.fix = false;
    config.fix_subtitles.minimum_duration = 0;
    let pipeline = Pipeline::new(&config, Box::new(WhatlangDetector));

    let (cues, report) = pipeline.consolidate(sample_detections());

    assert_eq!(report.merge.total(), 0);
    assert_eq!(report.extended, 0);
    assert_eq!(common::timeline(&cues), vec![
        (1_000, 1_500, "hello there".to_string()),
        (1_500, 2_200, "hello there".to_string()),
        (3_000, 3_200, "general kenobi".to_string()),
    ]);
}

#[test]
fn test_consolidate_withLocationRestriction_shouldDropOffscreenText() {
    let mut config = Config::default();
    config.detection.confidence = 10.0;
    config.fix_subtitles.stack = false;
    let location = &mut config.detection.subtitle_location;
    location.restrict_location = true;
    location.top = 70.0;
    location.bottom = 100.0;
    let pipeline = Pipeline::new(&config, Box::new(WhatlangDetector));

    let (cues, report) = pipeline.consolidate(sample_detections());

    assert_eq!(report.filter.outside_location, 1);
    assert!(cues.cues().all(|cue| cue.text != "EXIT"));
}

#[tokio::test]
async fn test_run_withTranslation_shouldMergeCuesThatTranslateAlike() {
    let mut config = Config::default();
    config.fix_subtitles.minimum_duration = 0;
    let translator = MockTranslator::dictionary([("안녕", "Hi"), ("안녕!", "Hi"), ("잘 가", "Bye")]);
    let stage = TranslationStage::new(Box::new(translator), "ko", "en");
    let pipeline = Pipeline::new(&config, Box::new(WhatlangDetector)).with_translation(stage);

    let detections = vec![
        common::detection(0, 500, "안녕"),
        common::detection(500, 1_000, "안녕!"),
        common::detection(2_000, 2_500, "잘 가"),
    ];
    let (cues, report) = pipeline.run(detections).await;

    let translation = report.translation.unwrap();
    assert_eq!(translation.translated, 3);
    assert_eq!(report.post_translation_merge.exact, 1);
    assert_eq!(common::timeline(&cues), vec![
        (0, 1_000, "Hi".to_string()),
        (2_000, 2_500, "Bye".to_string()),
    ]);
}

#[tokio::test]
async fn test_run_withFixDisabled_shouldStillMergeAfterTranslation() {
    let mut config = Config::default();
    config.fix_subtitles.fix = false;
    config.fix_subtitles.minimum_duration = 0;
    let translator = MockTranslator::dictionary([("안녕", "Hi"), ("안녕!", "Hi")]);
    let stage = TranslationStage::new(Box::new(translator), "ko", "en");
    let pipeline = Pipeline::new(&config, Box::new(WhatlangDetector)).with_translation(stage);

    let detections = vec![common::detection(0, 500, "안녕"), common::detection(500, 1_000, "안녕!")];
    let (cues, report) = pipeline.run(detections).await;

    assert_eq!(report.merge.total(), 0);
    assert_eq!(report.post_translation_merge.exact, 1);
    assert_eq!(common::timeline(&cues), vec![(0, 1_000, "Hi".to_string())]);
}

#[tokio::test]
async fn test_run_withFailingTranslator_shouldStillWriteOriginalCues() {
    let stage = TranslationStage::new(Box::new(MockTranslator::failing()), "ko", "en");
    let pipeline = Pipeline::new(&Config::default(), Box::new(WhatlangDetector)).with_translation(stage);
    assert!(pipeline.translates());

    let (cues, report) = pipeline.run(vec![common::detection(0, 2_000, "그대로")]).await;

    assert_eq!(report.translation.unwrap().failed, 1);
    assert_eq!(common::timeline(&cues), vec![(0, 2_000, "그대로".to_string())]);
    assert!(report.summary().contains("1 failed"));
}

#[test]
fn test_consolidate_withTwoLineSubtitle_shouldProduceSingleStackedCue() {
    let pipeline = Pipeline::new(&Config::default(), Box::new(WhatlangDetector));
    let detections = vec![
        RawDetection::new("second line", 0, 2_000, bottom_region(), 0.95),
        RawDetection::new("first line", 0, 2_000, top_region(), 0.95),
    ];

    let (cues, _) = pipeline.consolidate(detections);

    let all: Vec<Cue> = cues.into_cues();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].text, "first line\nsecond line");
}
