/*!
 * Error types for the ocrsub application.
 *
 * Fatal problems (unreadable input, a failed OCR run, broken configuration)
 * surface as `AppError`. Translation failures are reported per cue as
 * `ProviderError` and never abort the pipeline.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether a retry has a chance of succeeding
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }

    /// Map a non-success HTTP status to the matching variant
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised by a detection source (OCR over a video)
#[derive(Error, Debug)]
pub enum DetectionError {
    /// The input could not be read
    #[error("Failed to read input {path}: {message}")]
    Input {
        /// Offending path
        path: String,
        /// Underlying cause
        message: String,
    },

    /// The annotation service rejected the request or failed mid-operation
    #[error("Video annotation failed: {0}")]
    Service(String),

    /// The operation did not finish in time
    #[error("Video annotation timed out after {0} seconds")]
    Timeout(u64),

    /// The annotation payload could not be decoded
    #[error("Failed to parse annotation results: {0}")]
    ParseError(String),

    /// Transport level failure
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors that can occur while building or writing subtitles
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Output file already exists and overwriting was not requested
    #[error("Output file already exists: {0}")]
    OutputExists(String),

    /// Unsupported subtitle format tag
    #[error("Unknown subtitle format: {0}")]
    UnknownFormat(String),

    /// Writing the subtitle file failed
    #[error("Failed to write subtitles: {0}")]
    Write(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The backend answered but returned nothing usable
    #[error("Empty translation for: {0}")]
    EmptyResponse(String),

    /// The selected engine is missing credentials or settings
    #[error("Translation engine misconfigured: {0}")]
    Misconfigured(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the detection source
    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
