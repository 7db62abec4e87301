/*!
 * Tests for the translation stage using the mock translator
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ocrsub::pipeline::TranslationStage;
use ocrsub::providers::mock::MockTranslator;
use ocrsub::translation::TranslationCache;
use crate::common::{self, cue};

#[tokio::test]
async fn test_run_withWorkingTranslator_shouldReplaceEveryText() {
    common::init_logging();
    let mut cues = common::collection(vec![cue(0, 500, "하나"), cue(600, 900, "둘")]);
    let stage = TranslationStage::new(Box::new(MockTranslator::working()), "ko", "en");

    let stats = stage.run(&mut cues).await;

    assert_eq!(stats.translated, 2);
    assert_eq!(stats.failed, 0);
    assert_eq!(common::timeline(&cues), vec![
        (0, 500, "[en] 하나".to_string()),
        (600, 900, "[en] 둘".to_string()),
    ]);
}

#[tokio::test]
async fn test_run_withRepeatedTexts_shouldCallBackendOnce() {
    let translator = MockTranslator::working();
    let counter = translator.clone();
    let mut cues = common::collection(vec![
        cue(0, 500, "네"),
        cue(600, 900, "아니요"),
        cue(1_000, 1_500, "네"),
    ]);

    let stats = TranslationStage::new(Box::new(translator), "ko", "en").run(&mut cues).await;

    assert_eq!(counter.request_count(), 2);
    assert_eq!(stats.unique_texts, 2);
    assert_eq!(stats.translated, 3);
}

#[tokio::test]
async fn test_run_withSharedCache_shouldSkipKnownTexts() {
    let cache = TranslationCache::new();
    cache.store("네", "ko", "en", "Yes");
    let translator = MockTranslator::working();
    let counter = translator.clone();
    let mut cues = common::collection(vec![cue(0, 500, "네"), cue(600, 900, "아니요")]);

    let stage = TranslationStage::new(Box::new(translator), "ko", "en").with_cache(cache);
    let stats = stage.run(&mut cues).await;

    assert_eq!(counter.request_count(), 1);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stage.cache().stats().hit_rate(), 0.5);
    assert_eq!(cues.get(0).unwrap().text, "Yes");
}

#[tokio::test]
async fn test_run_withFailures_shouldKeepOriginalTextAndCount() {
    let translator = MockTranslator::dictionary([("하나", "one"), ("셋", "three")]);
    let mut cues = common::collection(vec![
        cue(0, 500, "하나"),
        cue(600, 900, "둘"),
        cue(1_000, 1_500, "셋"),
    ]);

    let stats = TranslationStage::new(Box::new(translator), "ko", "en").run(&mut cues).await;

    assert_eq!(stats.translated, 2);
    assert_eq!(stats.failed, 1);
    let texts: Vec<&str> = cues.cues().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "둘", "three"]);
}

#[tokio::test]
async fn test_run_withEmptyResponses_shouldTreatAsFailure() {
    let mut cues = common::collection(vec![cue(0, 500, "하나")]);

    let stats = TranslationStage::new(Box::new(MockTranslator::empty()), "ko", "en").run(&mut cues).await;

    assert_eq!(stats.failed, 1);
    assert_eq!(cues.get(0).unwrap().text, "하나");
}

#[tokio::test]
async fn test_run_withConcurrency_shouldApplyResultsInCueOrder() {
    let texts: Vec<String> = (0..20).map(|i| format!("line {}", i)).collect();
    let mut cues = common::collection(
        texts.iter().enumerate().map(|(i, t)| cue(i as u64 * 1_000, i as u64 * 1_000 + 500, t)).collect(),
    );

    let stats = TranslationStage::new(Box::new(MockTranslator::slow(5)), "ko", "en")
        .with_concurrency(4)
        .run(&mut cues)
        .await;

    assert_eq!(stats.translated, 20);
    for (cue, original) in cues.cues().zip(&texts) {
        assert_eq!(cue.text, format!("[en] {}", original));
    }
}

#[tokio::test]
async fn test_run_shouldReportProgressForEachDistinctText() {
    let calls = Arc::new(AtomicUsize::new(0));
    let last_total = Arc::new(AtomicUsize::new(0));
    let (c, t) = (calls.clone(), last_total.clone());
    let mut cues = common::collection(vec![cue(0, 500, "a"), cue(600, 900, "b"), cue(1_000, 1_200, "a")]);

    TranslationStage::new(Box::new(MockTranslator::working()), "ko", "en")
        .with_progress(Box::new(move |_done, total| {
            c.fetch_add(1, Ordering::SeqCst);
            t.store(total, Ordering::SeqCst);
        }))
        .run(&mut cues)
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(last_total.load(Ordering::SeqCst), 2);
}
