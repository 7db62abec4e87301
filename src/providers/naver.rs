use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils::primary_subtag;
use crate::providers::{RetryPolicy, Translator};

/// Naver Papago client
#[derive(Debug)]
pub struct Naver {
    /// HTTP client for API requests
    client: Client,
    /// Application client id (X-Naver-Client-Id)
    client_id: String,
    /// Application secret (X-Naver-Client-Secret)
    client_secret: String,
    /// n2mt endpoint
    endpoint: String,
    /// Retry behaviour for transient failures
    retry: RetryPolicy,
}

/// Papago response envelope
#[derive(Debug, Deserialize)]
pub struct PapagoResponse {
    pub message: PapagoMessage,
}

#[derive(Debug, Deserialize)]
pub struct PapagoMessage {
    pub result: PapagoResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PapagoResult {
    pub translated_text: String,
    #[serde(default)]
    pub src_lang_type: Option<String>,
    #[serde(default)]
    pub tar_lang_type: Option<String>,
}

impl Naver {
    /// Create a client against the public endpoint with default settings
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::new_with_config(
            &client_id.into(),
            &client_secret.into(),
            "https://openapi.naver.com/v1/papago/n2mt",
            Duration::from_secs(10),
            RetryPolicy::default(),
        )
    }

    pub fn new_with_config(
        client_id: &str,
        client_secret: &str,
        endpoint: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            endpoint: endpoint.to_string(),
            retry,
        }
    }

    async fn request(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        let params = [("source", source), ("target", target), ("text", text)];

        let response = self.client.post(&self.endpoint)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        parse_papago_response(&body)
    }
}

/// Pull the translated text out of a Papago response body
pub fn parse_papago_response(body: &str) -> Result<String, ProviderError> {
    let parsed: PapagoResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("Papago response: {}", e)))?;
    debug!("Papago detected {:?} -> {:?}",
           parsed.message.result.src_lang_type, parsed.message.result.tar_lang_type);
    Ok(parsed.message.result.translated_text)
}

#[async_trait]
impl Translator for Naver {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        // Papago takes bare codes except for Chinese ("zh-CN", "zh-TW")
        let source = papago_code(source_language);
        let target = papago_code(target_language);
        self.retry.run(|| self.request(text, &source, &target)).await
    }

    fn name(&self) -> &str {
        "Naver"
    }
}

fn papago_code(code: &str) -> String {
    let trimmed = code.trim();
    if trimmed.to_lowercase().starts_with("zh") && trimmed.contains('-') {
        trimmed.to_string()
    } else {
        primary_subtag(trimmed).to_lowercase()
    }
}
