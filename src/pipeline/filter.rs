use log::{debug, info};

use crate::app_config::{DetectionConfig, SubtitleLocationConfig};
use crate::cues::{BoundingRegion, CueCollection};
use crate::detection::{DetectedLanguage, LanguageDetector, RawDetection};
use crate::language_utils::language_codes_match;

/// Why a detection was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Confidence,
    Script,
    Language,
    Location,
}

/// Retained/discarded totals with a per-predicate breakdown.
///
/// A detection failing several predicates is counted once, under the first
/// one that rejected it (confidence, script, language, location).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub retained: usize,
    pub discarded: usize,
    pub low_confidence: usize,
    pub wrong_script: usize,
    pub wrong_language: usize,
    pub outside_location: usize,
}

impl FilterStats {
    fn record(&mut self, rejection: Rejection) {
        self.discarded += 1;
        match rejection {
            Rejection::Confidence => self.low_confidence += 1,
            Rejection::Script => self.wrong_script += 1,
            Rejection::Language => self.wrong_language += 1,
            Rejection::Location => self.outside_location += 1,
        }
    }
}

/// Keeps the detections that look like subtitles
pub struct DetectionFilter {
    config: DetectionConfig,
    detector: Box<dyn LanguageDetector>,
}

impl DetectionFilter {
    pub fn new(config: &DetectionConfig, detector: Box<dyn LanguageDetector>) -> Self {
        Self {
            config: config.clone(),
            detector,
        }
    }

    /// Check one detection against the confidence predicate and every
    /// enabled optional predicate
    pub fn check(&self, detection: &RawDetection) -> Result<(), Rejection> {
        if detection.confidence * 100.0 <= self.config.confidence {
            return Err(Rejection::Confidence);
        }

        let language_config = &self.config.language;
        if language_config.filter_script || language_config.filter_language {
            let detected = self.identify(detection);

            if language_config.filter_script {
                let matches = detected.script
                    .as_deref()
                    .is_some_and(|script| script.eq_ignore_ascii_case(language_config.script.trim()));
                if !matches {
                    return Err(Rejection::Script);
                }
            }

            if language_config.filter_language {
                let matches = detected.language
                    .as_deref()
                    .is_some_and(|language| language_codes_match(language, &language_config.language));
                if !matches {
                    return Err(Rejection::Language);
                }
            }
        }

        if self.config.subtitle_location.restrict_location
            && !region_within(&detection.region, &self.config.subtitle_location)
        {
            return Err(Rejection::Location);
        }

        Ok(())
    }

    pub fn accepts(&self, detection: &RawDetection) -> bool {
        self.check(detection).is_ok()
    }

    /// Filter a batch of detections into a cue collection
    pub fn apply(&self, detections: Vec<RawDetection>) -> (CueCollection, FilterStats) {
        let mut stats = FilterStats::default();
        let mut cues = CueCollection::new();

        for detection in detections {
            match self.check(&detection) {
                Ok(()) => {
                    stats.retained += 1;
                    cues.insert(detection.into_cue());
                }
                Err(rejection) => {
                    debug!("Discarding '{}' at {}ms: {:?}", detection.text, detection.start_ms, rejection);
                    stats.record(rejection);
                }
            }
        }

        info!("Retained {} detections, discarded {}", stats.retained, stats.discarded);
        if stats.discarded > 0 {
            info!(
                "Discarded by confidence: {}, script: {}, language: {}, location: {}",
                stats.low_confidence, stats.wrong_script, stats.wrong_language, stats.outside_location
            );
        }

        (cues, stats)
    }

    fn identify(&self, detection: &RawDetection) -> DetectedLanguage {
        if detection.script.is_some() && detection.language.is_some() {
            return DetectedLanguage {
                script: detection.script.clone(),
                language: detection.language.clone(),
            };
        }

        let detected = self.detector.detect(&detection.text);
        DetectedLanguage {
            script: detection.script.clone().or(detected.script),
            language: detection.language.clone().or(detected.language),
        }
    }
}

/// All four vertices strictly inside the configured area (percent scale).
/// Top is checked on vertices 0 and 1, bottom on 2 and 3, left on 0 and 3,
/// right on 1 and 2.
pub fn region_within(region: &BoundingRegion, area: &SubtitleLocationConfig) -> bool {
    let [v0, v1, v2, v3] = region.vertices;

    let top = v0.y * 100.0 > area.top && v1.y * 100.0 > area.top;
    let bottom = v2.y * 100.0 < area.bottom && v3.y * 100.0 < area.bottom;
    let left = v0.x * 100.0 > area.left && v3.x * 100.0 > area.left;
    let right = v1.x * 100.0 < area.right && v2.x * 100.0 < area.right;

    top && bottom && left && right
}
