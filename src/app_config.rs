use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::subtitle_writer::SubtitleFormat;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Video (or saved annotation JSON) to read detections from
    #[serde(default)]
    pub input_file: String,

    /// Subtitle file to write
    #[serde(default)]
    pub output_file: String,

    /// Output subtitle format
    #[serde(default)]
    pub output_format: SubtitleFormat,

    /// Detection filter settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// OCR service settings
    #[serde(default)]
    pub video_intelligence: VideoIntelligenceConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Cue consolidation settings
    #[serde(default)]
    pub fix_subtitles: FixSubtitlesConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Which raw detections are kept
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DetectionConfig {
    /// Minimum confidence, percent scale (0-100). Always applied.
    #[serde(default = "default_confidence")]
    pub confidence: f32,

    /// Script and language predicates
    #[serde(default)]
    pub language: LanguageFilterConfig,

    /// Screen region predicate
    #[serde(default)]
    pub subtitle_location: SubtitleLocationConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence: default_confidence(),
            language: LanguageFilterConfig::default(),
            subtitle_location: SubtitleLocationConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LanguageFilterConfig {
    // @field: Enable the script predicate
    #[serde(default)]
    pub filter_script: bool,

    // @field: Script name as reported by the detector (e.g. "Latin", "Hangul")
    #[serde(default)]
    pub script: String,

    // @field: Enable the language predicate
    #[serde(default)]
    pub filter_language: bool,

    // @field: ISO 639 code, 2 or 3 letters
    #[serde(default)]
    pub language: String,

    // @field: Send language hints to the OCR service
    #[serde(default)]
    pub detect_language: bool,

    // @field: BCP-47 hints for the OCR service
    #[serde(default)]
    pub language_hints: Vec<String>,
}

/// Screen area subtitles are expected in, percent of frame size
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleLocationConfig {
    #[serde(default)]
    pub restrict_location: bool,

    #[serde(default)]
    pub top: f32,

    #[serde(default = "default_hundred")]
    pub bottom: f32,

    #[serde(default)]
    pub left: f32,

    #[serde(default = "default_hundred")]
    pub right: f32,
}

impl Default for SubtitleLocationConfig {
    fn default() -> Self {
        Self {
            restrict_location: false,
            top: 0.0,
            bottom: default_hundred(),
            left: 0.0,
            right: default_hundred(),
        }
    }
}

/// Google Video Intelligence settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VideoIntelligenceConfig {
    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_video_intelligence_endpoint")]
    pub endpoint: String,

    /// Seconds between operation status checks
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Give up on the operation after this many seconds
    #[serde(default = "default_annotation_timeout_secs")]
    pub timeout_secs: u64,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for VideoIntelligenceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_video_intelligence_endpoint(),
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_annotation_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Translation engine
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationEngine {
    // @engine: Naver Papago
    #[default]
    Naver,
    // @engine: Google Cloud Translation
    Google,
}

impl TranslationEngine {
    // @returns: Capitalized engine name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Naver => "Naver",
            Self::Google => "Google",
        }
    }
}

impl std::fmt::Display for TranslationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name().to_lowercase())
    }
}

impl std::str::FromStr for TranslationEngine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "naver" | "papago" => Ok(Self::Naver),
            "google" => Ok(Self::Google),
            _ => Err(anyhow!("Invalid translation engine: {}", s)),
        }
    }
}

/// Naver Papago settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NaverConfig {
    #[serde(default = "String::new")]
    pub client_id: String,

    #[serde(default = "String::new")]
    pub client_secret: String,

    #[serde(default = "default_naver_endpoint")]
    pub endpoint: String,
}

impl Default for NaverConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            endpoint: default_naver_endpoint(),
        }
    }
}

/// Google Cloud Translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoogleConfig {
    #[serde(default = "String::new")]
    pub api_key: String,

    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_google_endpoint(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Whether cues are translated at all
    #[serde(default)]
    pub translate: bool,

    /// Translation engine to use
    #[serde(default)]
    pub engine: TranslationEngine,

    /// Source language code
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    #[serde(default)]
    pub naver: NaverConfig,

    #[serde(default)]
    pub google: GoogleConfig,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            translate: false,
            engine: TranslationEngine::default(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            naver: NaverConfig::default(),
            google: GoogleConfig::default(),
            common: TranslationCommonConfig::default(),
        }
    }
}

/// Common translation settings applicable to all engines
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Request timeout in seconds
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Maximum number of cues translated at the same time
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_translation_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

/// Cue consolidation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FixSubtitlesConfig {
    /// Merge consecutive duplicate cues
    #[serde(default = "default_true")]
    pub fix: bool,

    /// Treat texts differing only in spaces as duplicates
    #[serde(default = "default_true")]
    pub ignore_whitespace: bool,

    /// Enable token-overlap matching
    #[serde(default)]
    pub partial_match: bool,

    /// Token overlap (percent) that must be exceeded to merge
    #[serde(default = "default_partial_match_percentage")]
    pub partial_match_percentage: u32,

    /// Minimum on-screen time in milliseconds, 0 disables
    #[serde(default = "default_minimum_duration")]
    pub minimum_duration: u64,

    /// Combine simultaneous cues from different screen areas
    #[serde(default = "default_true")]
    pub stack: bool,
}

impl Default for FixSubtitlesConfig {
    fn default() -> Self {
        Self {
            fix: true,
            ignore_whitespace: true,
            partial_match: false,
            partial_match_percentage: default_partial_match_percentage(),
            minimum_duration: default_minimum_duration(),
            stack: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_confidence() -> f32 {
    80.0
}

fn default_hundred() -> f32 {
    100.0
}

fn default_true() -> bool {
    true
}

fn default_partial_match_percentage() -> u32 {
    60
}

fn default_minimum_duration() -> u64 {
    1000
}

fn default_source_language() -> String {
    "ko".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_translation_timeout_secs() -> u64 {
    10
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // doubled on each retry
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_annotation_timeout_secs() -> u64 {
    900
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_video_intelligence_endpoint() -> String {
    "https://videointelligence.googleapis.com".to_string()
}

fn default_naver_endpoint() -> String {
    "https://openapi.naver.com/v1/papago/n2mt".to_string()
}

fn default_google_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn check_percent(name: &str, value: f32) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(anyhow!("{} must be between 0 and 100, got {}", name, value));
    }
    Ok(())
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        check_percent("detection.confidence", self.detection.confidence)?;

        let location = &self.detection.subtitle_location;
        if location.restrict_location {
            check_percent("subtitle_location.top", location.top)?;
            check_percent("subtitle_location.bottom", location.bottom)?;
            check_percent("subtitle_location.left", location.left)?;
            check_percent("subtitle_location.right", location.right)?;
            if location.top >= location.bottom || location.left >= location.right {
                return Err(anyhow!("subtitle_location describes an empty area"));
            }
        }

        let language = &self.detection.language;
        if language.filter_language {
            crate::language_utils::get_language_name(&language.language)
                .map_err(|e| anyhow!("detection.language.language: {}", e))?;
        }
        if language.filter_script && language.script.trim().is_empty() {
            return Err(anyhow!("detection.language.script is required when filter_script is enabled"));
        }

        if self.fix_subtitles.partial_match_percentage > 100 {
            return Err(anyhow!(
                "fix_subtitles.partial_match_percentage must be between 0 and 100, got {}",
                self.fix_subtitles.partial_match_percentage
            ));
        }

        if self.translation.translate {
            self.translation.validate()?;
        }

        Ok(())
    }
}

impl TranslationConfig {
    /// Check languages and the selected engine's credentials
    pub fn validate(&self) -> Result<()> {
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        match self.engine {
            TranslationEngine::Naver => {
                if self.naver.client_id.is_empty() || self.naver.client_secret.is_empty() {
                    return Err(anyhow!("Naver client id and secret are required for translation"));
                }
            }
            TranslationEngine::Google => {
                if self.google.api_key.is_empty() {
                    return Err(anyhow!("Google API key is required for translation"));
                }
            }
        }

        if self.common.concurrent_requests == 0 {
            return Err(anyhow!("translation.common.concurrent_requests must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_file: String::new(),
            output_file: String::new(),
            output_format: SubtitleFormat::default(),
            detection: DetectionConfig::default(),
            video_intelligence: VideoIntelligenceConfig::default(),
            translation: TranslationConfig::default(),
            fix_subtitles: FixSubtitlesConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
