/*!
 * Raw OCR detections and the sources that produce them.
 *
 * - `annotation`: JSON model of Video Intelligence text annotations and its
 *   conversion into [`RawDetection`]s
 * - `video_intelligence`: REST client running text detection on a video
 * - `file`: reads a saved annotation response from disk
 * - `language`: script / language detection used by the detection filter
 */

use std::path::Path;

use async_trait::async_trait;

use crate::cues::{BoundingRegion, Cue};
use crate::errors::DetectionError;

pub mod annotation;
pub mod file;
pub mod language;
pub mod video_intelligence;

pub use self::file::AnnotationFile;
pub use self::language::{DetectedLanguage, LanguageDetector, WhatlangDetector};
pub use self::video_intelligence::VideoIntelligenceClient;

/// One OCR result before filtering
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub region: BoundingRegion,
    /// OCR confidence in [0, 1]
    pub confidence: f32,
    /// Script name if the source already knows it
    pub script: Option<String>,
    /// ISO 639 code if the source already knows it
    pub language: Option<String>,
}

impl RawDetection {
    pub fn new(text: impl Into<String>, start_ms: u64, end_ms: u64, region: BoundingRegion, confidence: f32) -> Self {
        Self {
            text: text.into(),
            start_ms,
            end_ms,
            region,
            confidence,
            script: None,
            language: None,
        }
    }

    pub fn into_cue(self) -> Cue {
        Cue::new(self.start_ms, self.end_ms, self.text, self.region, self.confidence)
    }
}

/// Producer of raw detections for one input. One-shot: a source returns the
/// complete, unordered set for the input or fails.
#[async_trait]
pub trait DetectionSource: Send + Sync {
    /// Run detection on `input`
    async fn detect(&self, input: &Path) -> Result<Vec<RawDetection>, DetectionError>;

    /// Human readable name for logs
    fn name(&self) -> &str;
}
