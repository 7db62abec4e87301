/*!
 * Subtitle consolidation pipeline.
 *
 * Raw detections flow through these stages:
 * 1. `filter`: drop detections that do not look like subtitles
 * 2. `merger`: collapse consecutive cues repeating the same text
 * 3. `translate`: optional per-cue translation, always followed by a second
 *    merge
 * 4. `stacker`: combine simultaneous cues from different screen areas
 * 5. `duration`: give every cue a minimum on-screen time
 */

use std::time::{Duration, Instant};

use log::info;

use crate::app_config::Config;
use crate::cues::CueCollection;
use crate::detection::{LanguageDetector, RawDetection, WhatlangDetector};
use crate::errors::TranslationError;
use crate::providers::create_translator;

pub mod duration;
pub mod filter;
pub mod merger;
pub mod stacker;
pub mod translate;

pub use self::duration::DurationEnforcer;
pub use self::filter::{DetectionFilter, FilterStats, Rejection};
pub use self::merger::{CueMerger, MergeReason, MergeStats};
pub use self::stacker::CueStacker;
pub use self::translate::{ProgressCallback, TranslationStage, TranslationStats};

/// What each stage did during one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    /// Detections received from the source
    pub detections: usize,
    pub filter: FilterStats,
    pub merge: MergeStats,
    pub translation: Option<TranslationStats>,
    /// Merges after translation
    pub post_translation_merge: MergeStats,
    pub stacked: usize,
    pub extended: usize,
    /// Cues in the final collection
    pub cues: usize,
    pub duration: Duration,
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        parts.push(format!("Detections: {} ({} kept)", self.detections, self.filter.retained));
        parts.push(format!("Merged: {}", self.merge.total() + self.post_translation_merge.total()));

        if let Some(ref translation) = self.translation {
            parts.push(format!(
                "Translated: {}/{} ({} failed)",
                translation.translated, translation.cues, translation.failed
            ));
        }

        parts.push(format!("Stacked: {}", self.stacked));
        parts.push(format!("Extended: {}", self.extended));
        parts.push(format!("Cues: {}", self.cues));
        parts.push(format!("Duration: {:.2}s", self.duration.as_secs_f32()));

        parts.join(" | ")
    }
}

/// Configured chain of stages. Disabled stages are `None`.
pub struct Pipeline {
    filter: DetectionFilter,
    merger: Option<CueMerger>,
    // @field: Runs after translation even when `fix` is off
    post_translation_merger: CueMerger,
    translation: Option<TranslationStage>,
    stacker: Option<CueStacker>,
    duration: Option<DurationEnforcer>,
}

impl Pipeline {
    /// Build the consolidation stages from configuration, without translation
    pub fn new(config: &Config, detector: Box<dyn LanguageDetector>) -> Self {
        let fix = &config.fix_subtitles;
        Self {
            filter: DetectionFilter::new(&config.detection, detector),
            merger: fix.fix.then(|| CueMerger::new(fix)),
            post_translation_merger: CueMerger::new(fix),
            translation: None,
            stacker: fix.stack.then(CueStacker::new),
            duration: (fix.minimum_duration > 0).then(|| DurationEnforcer::new(fix.minimum_duration)),
        }
    }

    /// Full pipeline: whatlang detection and, if enabled, the configured
    /// translation engine
    pub fn from_config(config: &Config) -> Result<Self, TranslationError> {
        let pipeline = Self::new(config, Box::new(WhatlangDetector));
        if !config.translation.translate {
            return Ok(pipeline);
        }

        let translation = &config.translation;
        let stage = TranslationStage::new(
            create_translator(translation)?,
            translation.source_language.clone(),
            translation.target_language.clone(),
        )
        .with_concurrency(translation.common.concurrent_requests);

        Ok(pipeline.with_translation(stage))
    }

    pub fn with_translation(mut self, stage: TranslationStage) -> Self {
        self.translation = Some(stage);
        self
    }

    pub fn translation_mut(&mut self) -> Option<&mut TranslationStage> {
        self.translation.as_mut()
    }

    pub fn translates(&self) -> bool {
        self.translation.is_some()
    }

    /// Run every stage over the detections
    pub async fn run(&self, detections: Vec<RawDetection>) -> (CueCollection, PipelineReport) {
        let started = Instant::now();
        let mut report = PipelineReport {
            detections: detections.len(),
            ..PipelineReport::default()
        };

        let (mut cues, filter_stats) = self.filter.apply(detections);
        report.filter = filter_stats;

        if let Some(merger) = &self.merger {
            report.merge = merger.merge(&mut cues);
        }

        if let Some(stage) = &self.translation {
            report.translation = Some(stage.run(&mut cues).await);
            report.post_translation_merge = self.post_translation_merger.merge(&mut cues);
        }

        self.finish(&mut cues, &mut report);
        report.duration = started.elapsed();
        (cues, report)
    }

    /// Consolidation only, skipping any translation stage
    pub fn consolidate(&self, detections: Vec<RawDetection>) -> (CueCollection, PipelineReport) {
        let started = Instant::now();
        let mut report = PipelineReport {
            detections: detections.len(),
            ..PipelineReport::default()
        };

        let (mut cues, filter_stats) = self.filter.apply(detections);
        report.filter = filter_stats;

        if let Some(merger) = &self.merger {
            report.merge = merger.merge(&mut cues);
        }

        self.finish(&mut cues, &mut report);
        report.duration = started.elapsed();
        (cues, report)
    }

    fn finish(&self, cues: &mut CueCollection, report: &mut PipelineReport) {
        if let Some(stacker) = &self.stacker {
            report.stacked = stacker.stack(cues);
        }
        if let Some(enforcer) = &self.duration {
            report.extended = enforcer.enforce(cues);
        }
        report.cues = cues.len();
        info!("Pipeline produced {} cues from {} detections", report.cues, report.detections);
    }
}
