//! Gemini API client error types.

use std::sync::Arc;

/// Errors from the Gemini API client.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// No API key configured.
    #[error("missing API key: MEDKIT_GEMINI_API_KEY not set")]
    MissingApiKey,

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited or quota exhausted.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// The prompt was refused by safety filters.
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// The response carried no text.
    #[error("empty response from model")]
    EmptyResponse,

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { GeminiError::Timeout } else { GeminiError::Network(Arc::new(err)) }
    }
}
