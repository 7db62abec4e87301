use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use crate::cues::CueCollection;
use crate::errors::TranslationError;
use crate::providers::Translator;
use crate::translation::cache::{truncate_text, TranslationCache};

/// Called with (completed, total) after each distinct text is handled
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Outcome counts for one translation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Cues seen
    pub cues: usize,
    /// Cues whose text was replaced
    pub translated: usize,
    /// Cues left in the source language after a failure
    pub failed: usize,
    /// Distinct texts in the pass
    pub unique_texts: usize,
    /// Distinct texts answered from the cache
    pub cache_hits: usize,
}

/// Replaces every cue's text with its translation.
///
/// Identical texts are translated once. A failure only affects the cues
/// carrying that text: they keep their original text and are counted.
pub struct TranslationStage {
    translator: Box<dyn Translator>,
    cache: TranslationCache,
    source_language: String,
    target_language: String,
    concurrent_requests: usize,
    progress: Option<ProgressCallback>,
}

impl TranslationStage {
    pub fn new(
        translator: Box<dyn Translator>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            cache: TranslationCache::new(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            concurrent_requests: 1,
            progress: None,
        }
    }

    /// In-flight requests; results are still applied in cue order
    pub fn with_concurrency(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn set_progress(&mut self, progress: ProgressCallback) {
        self.progress = Some(progress);
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn translator_name(&self) -> &str {
        self.translator.name()
    }

    async fn translate_text(&self, text: &str) -> (Result<String, TranslationError>, bool) {
        if let Some(cached) = self.cache.get(text, &self.source_language, &self.target_language) {
            return (Ok(cached), true);
        }

        let result = self.translator
            .translate(text, &self.source_language, &self.target_language)
            .await
            .map_err(TranslationError::from)
            .and_then(|translated| {
                if translated.trim().is_empty() {
                    Err(TranslationError::EmptyResponse(truncate_text(text, 30)))
                } else {
                    Ok(translated)
                }
            });

        if let Ok(translated) = &result {
            self.cache.store(text, &self.source_language, &self.target_language, translated);
        }
        (result, false)
    }

    /// Translate all cues in place
    pub async fn run(&self, cues: &mut CueCollection) -> TranslationStats {
        let mut stats = TranslationStats {
            cues: cues.len(),
            ..TranslationStats::default()
        };

        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique: Vec<String> = Vec::new();
        for cue in cues.cues() {
            if !cue.text.trim().is_empty() && seen.insert(cue.text.as_str()) {
                unique.push(cue.text.clone());
            }
        }
        stats.unique_texts = unique.len();

        info!(
            "Translating {} cues ({} distinct texts) from {} to {} with {}",
            stats.cues, stats.unique_texts, self.source_language, self.target_language, self.translator.name()
        );

        let total = unique.len();
        let completed = AtomicUsize::new(0);

        let results: Vec<(Result<String, TranslationError>, bool)> = stream::iter(unique.iter())
            .map(|text| {
                let completed = &completed;
                async move {
                    let outcome = self.translate_text(text).await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(progress) = &self.progress {
                        progress(done, total);
                    }
                    outcome
                }
            })
            .buffered(self.concurrent_requests)
            .collect()
            .await;

        let mut translations: HashMap<&str, Result<String, TranslationError>> = HashMap::new();
        for (text, (result, from_cache)) in unique.iter().zip(results) {
            if from_cache {
                stats.cache_hits += 1;
            }
            if let Err(e) = &result {
                warn!("Failed to translate '{}': {}", truncate_text(text, 30), e);
            }
            translations.insert(text.as_str(), result);
        }

        for cue in cues.cues_mut() {
            match translations.get(cue.text.as_str()) {
                Some(Ok(translated)) => {
                    debug!("'{}' -> '{}'", cue.text, translated);
                    cue.text = translated.clone();
                    stats.translated += 1;
                }
                Some(Err(_)) => stats.failed += 1,
                None => {}
            }
        }

        if stats.failed > 0 {
            warn!("{} of {} cues kept their original text", stats.failed, stats.cues);
        }
        info!(
            "Translated {} cues ({} cache hits, {:.0}% hit rate overall)",
            stats.translated, stats.cache_hits, self.cache.stats().hit_rate() * 100.0
        );

        stats
    }
}
