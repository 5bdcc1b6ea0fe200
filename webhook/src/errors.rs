use thiserror::Error;

/// Result type alias for webhook operations
pub type Result<T, E = WebhookError> = std::result::Result<T, E>;

/// Errors that can occur while translating and delivering alerts
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Failed to read request body: {0}")]
    RequestBodyError(String),

    #[error("Malformed alert timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Unsupported link format: {0}")]
    UnsupportedLinkFormat(String),

    #[error("Failed to serialize response: {0}")]
    ResponseSerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
