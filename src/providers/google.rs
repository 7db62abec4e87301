use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::language_utils::primary_subtag;
use crate::providers::{RetryPolicy, Translator};

/// Google Cloud Translation (v2) client
#[derive(Debug)]
pub struct Google {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// translate/v2 endpoint
    endpoint: String,
    /// Retry behaviour for transient failures
    retry: RetryPolicy,
}

/// v2 translate request body
#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    q: &'a str,
    source: String,
    target: String,
    // plain text keeps quotes and ampersands unescaped
    format: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    pub data: TranslateData,
}

#[derive(Debug, Deserialize)]
pub struct TranslateData {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

impl Google {
    /// Create a client against the public endpoint with default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::new_with_config(
            &api_key.into(),
            "https://translation.googleapis.com/language/translate/v2",
            Duration::from_secs(10),
            RetryPolicy::default(),
        )
    }

    pub fn new_with_config(api_key: &str, endpoint: &str, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            retry,
        }
    }

    async fn request(&self, body: &TranslateRequest<'_>) -> Result<String, ProviderError> {
        let url = Url::parse_with_params(&self.endpoint, &[("key", &self.api_key)])
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", self.endpoint, e)))?;

        let response = self.client.post(url)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let text = response.text().await?;
        parse_translate_response(&text)
    }
}

/// Pull the first translation out of a v2 response body
pub fn parse_translate_response(body: &str) -> Result<String, ProviderError> {
    let parsed: TranslateResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("Google response: {}", e)))?;
    parsed.data.translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
        .ok_or_else(|| ProviderError::ParseError("Google response has no translations".to_string()))
}

#[async_trait]
impl Translator for Google {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let body = TranslateRequest {
            q: text,
            source: primary_subtag(source_language).to_lowercase(),
            target: primary_subtag(target_language).to_lowercase(),
            format: "text",
        };
        self.retry.run(|| self.request(&body)).await
    }

    fn name(&self) -> &str {
        "Google"
    }
}
