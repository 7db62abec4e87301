/*!
 * Scripted translator for tests.
 *
 * - `MockTranslator::working()` - prefixes every text with the target language
 * - `MockTranslator::intermittent(n)` - fails every n-th request
 * - `MockTranslator::failing()` - always fails
 * - `MockTranslator::dictionary(..)` - answers from a fixed lookup table
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails every Nth request with a server error
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Succeeds with an empty string
    Empty,
    /// Sleeps before succeeding
    Slow { delay_ms: u64 },
}

/// Mock translator with a request counter shared between clones
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    dictionary: Option<Arc<HashMap<String, String>>>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            dictionary: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Working translator answering from `entries`; unknown texts fail
    pub fn dictionary<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self {
            dictionary: Some(Arc::new(map)),
            ..Self::working()
        }
    }

    /// Number of translate calls seen so far, across clones
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn answer(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        match &self.dictionary {
            Some(map) => map.get(text).cloned().ok_or_else(|| ProviderError::ApiError {
                status_code: 400,
                message: format!("No scripted translation for '{}'", text),
            }),
            None => Ok(format!("[{}] {}", target_language, text)),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => self.answer(text, target_language),
            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                    })
                } else {
                    self.answer(text, target_language)
                }
            }
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),
            MockBehavior::Empty => Ok(String::new()),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                self.answer(text, target_language)
            }
        }
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
