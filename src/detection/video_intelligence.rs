use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::app_config::VideoIntelligenceConfig;
use crate::detection::annotation::Operation;
use crate::detection::{DetectionSource, RawDetection};
use crate::errors::{DetectionError, ProviderError};
use crate::file_utils::FileManager;

/// Consecutive failed status checks tolerated before giving up
const MAX_POLL_FAILURES: u32 = 3;

/// Video Intelligence client running text detection over a video
pub struct VideoIntelligenceClient {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
    /// Delay between operation status checks
    poll_interval: Duration,
    /// Overall operation deadline
    timeout: Duration,
    /// Hints forwarded to text detection
    language_hints: Vec<String>,
}

/// `videos:annotate` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateVideoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    input_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_content: Option<String>,
    features: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_context: Option<VideoContext>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoContext {
    text_detection_config: TextDetectionConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextDetectionConfig {
    language_hints: Vec<String>,
}

impl AnnotateVideoRequest {
    /// Request for a video already in Cloud Storage
    pub fn for_uri(uri: impl Into<String>) -> Self {
        Self {
            input_uri: Some(uri.into()),
            input_content: None,
            features: vec!["TEXT_DETECTION"],
            video_context: None,
        }
    }

    /// Request carrying the video bytes inline
    pub fn for_content(bytes: &[u8]) -> Self {
        Self {
            input_uri: None,
            input_content: Some(BASE64.encode(bytes)),
            features: vec!["TEXT_DETECTION"],
            video_context: None,
        }
    }

    /// Attach language hints; an empty list leaves the request unchanged
    pub fn language_hints(mut self, hints: &[String]) -> Self {
        if !hints.is_empty() {
            self.video_context = Some(VideoContext {
                text_detection_config: TextDetectionConfig {
                    language_hints: hints.to_vec(),
                },
            });
        }
        self
    }
}

impl VideoIntelligenceClient {
    /// Create a new client from configuration
    pub fn new(config: &VideoIntelligenceConfig, language_hints: Vec<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
            timeout: Duration::from_secs(config.timeout_secs),
            language_hints,
        }
    }

    fn url(&self, path: &str) -> Result<Url, DetectionError> {
        Url::parse_with_params(&format!("{}/v1/{}", self.endpoint, path), &[("key", &self.api_key)])
            .map_err(|e| DetectionError::Service(format!("Invalid endpoint '{}': {}", self.endpoint, e)))
    }

    /// Start an annotation operation and return its name
    pub async fn start(&self, request: &AnnotateVideoRequest) -> Result<String, DetectionError> {
        let response = self.client.post(self.url("videos:annotate")?)
            .json(request)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::from_status(status.as_u16(), error_text).into());
        }

        let operation: Operation = response.json().await.map_err(ProviderError::from)?;
        if operation.name.is_empty() {
            return Err(DetectionError::ParseError("annotate response has no operation name".to_string()));
        }
        Ok(operation.name)
    }

    /// Fetch the current state of an operation
    pub async fn poll(&self, name: &str) -> Result<Operation, DetectionError> {
        let response = self.client.get(self.url(name)?)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::from_status(status.as_u16(), error_text).into());
        }

        Ok(response.json().await.map_err(ProviderError::from)?)
    }

    /// Poll until the operation is done or the deadline passes
    pub async fn wait(&self, name: &str) -> Result<Operation, DetectionError> {
        let started = Instant::now();
        let mut failures = 0;

        loop {
            match self.poll(name).await {
                Ok(operation) if operation.done => return Ok(operation),
                Ok(_) => {
                    failures = 0;
                    debug!("Annotation still running after {:?}", started.elapsed());
                }
                Err(DetectionError::Provider(e)) if e.is_retryable() && failures < MAX_POLL_FAILURES => {
                    failures += 1;
                    warn!("Status check failed ({}/{}): {}", failures, MAX_POLL_FAILURES, e);
                }
                Err(e) => return Err(e),
            }

            if started.elapsed() >= self.timeout {
                return Err(DetectionError::Timeout(self.timeout.as_secs()));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn build_request(&self, input: &Path) -> Result<AnnotateVideoRequest, DetectionError> {
        let input_str = input.to_string_lossy();
        let request = if input_str.starts_with("gs://") {
            AnnotateVideoRequest::for_uri(input_str.to_string())
        } else {
            let bytes = FileManager::read_bytes(input).map_err(|e| DetectionError::Input {
                path: input.display().to_string(),
                message: format!("{:#}", e),
            })?;
            AnnotateVideoRequest::for_content(&bytes)
        };
        Ok(request.language_hints(&self.language_hints))
    }
}

#[async_trait]
impl DetectionSource for VideoIntelligenceClient {
    async fn detect(&self, input: &Path) -> Result<Vec<RawDetection>, DetectionError> {
        let request = self.build_request(input)?;

        info!("Doing OCR through the Video Intelligence API");
        let name = self.start(&request).await?;
        debug!("Started annotation operation {}", name);

        let operation = self.wait(&name).await?;
        Ok(operation.into_response()?.into_detections())
    }

    fn name(&self) -> &str {
        "Video Intelligence"
    }
}
