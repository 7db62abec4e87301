/*!
 * Translation backends.
 *
 * This module contains client implementations for the supported engines:
 * - Naver: Papago machine translation API
 * - Google: Cloud Translation v2 REST API
 * - Mock: scripted translator for tests
 */

use async_trait::async_trait;
use log::warn;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationEngine, TranslationCommonConfig};
use crate::errors::{ProviderError, TranslationError};

/// Common trait for all translation backends
///
/// One call translates one cue's text. Implementations must be usable from
/// several tasks at once.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` from `source_language` to `target_language`
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Engine name for logs
    fn name(&self) -> &str;
}

/// Retry with exponential backoff for transient provider failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled each time
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self { max_retries, backoff_base_ms }
    }

    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self::new(common.retry_count, common.retry_backoff_ms)
    }

    /// Run `operation` until it succeeds, fails permanently, or retries run out
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.backoff_base_ms.saturating_mul(1u64 << attempt.min(16));
                    attempt += 1;
                    warn!("Request failed (attempt {}/{}), retrying in {}ms: {}",
                          attempt, self.max_retries + 1, delay, e);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000)
    }
}

/// Build the translator for the configured engine
pub fn create_translator(config: &TranslationConfig) -> Result<Box<dyn Translator>, TranslationError> {
    let timeout = Duration::from_secs(config.common.timeout_secs);
    let retry = RetryPolicy::from_config(&config.common);

    match config.engine {
        TranslationEngine::Naver => {
            if config.naver.client_id.is_empty() || config.naver.client_secret.is_empty() {
                return Err(TranslationError::Misconfigured("Naver client id and secret are required".to_string()));
            }
            Ok(Box::new(naver::Naver::new_with_config(
                &config.naver.client_id,
                &config.naver.client_secret,
                &config.naver.endpoint,
                timeout,
                retry,
            )))
        }
        TranslationEngine::Google => {
            if config.google.api_key.is_empty() {
                return Err(TranslationError::Misconfigured("Google API key is required".to_string()));
            }
            Ok(Box::new(google::Google::new_with_config(
                &config.google.api_key,
                &config.google.endpoint,
                timeout,
                retry,
            )))
        }
    }
}

pub mod google;
pub mod mock;
pub mod naver;
