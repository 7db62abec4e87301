//! Script and language detection for recognized text.

use log::trace;

/// What a detector found out about a piece of text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetectedLanguage {
    /// Script name, e.g. "Latin", "Hangul", "Cyrillic"
    pub script: Option<String>,
    /// ISO 639-3 code, e.g. "eng", "kor"
    pub language: Option<String>,
}

/// Pluggable language identification used by the detection filter
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> DetectedLanguage;
}

/// [`LanguageDetector`] backed by the `whatlang` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> DetectedLanguage {
        let script = whatlang::detect_script(text).map(|s| s.name().to_string());
        let language = whatlang::detect(text).map(|info| info.lang().code().to_string());
        trace!("Detected {:?} / {:?} for '{}'", script, language, text);
        DetectedLanguage { script, language }
    }
}
