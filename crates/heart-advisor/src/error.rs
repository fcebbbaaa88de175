//! Error types for the health advisor.

use thiserror::Error;

/// Errors that can occur while requesting AI commentary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdvisorError {
    /// No API key was configured.
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),

    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("chat API returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// The endpoint rate-limited the request.
    #[error("chat API rate limit exceeded")]
    RateLimited,

    /// Failed to parse JSON response.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The response had no usable message content.
    #[error("chat API returned an empty reply")]
    EmptyReply,
}

impl AdvisorError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::MissingApiKey(_) => "AI assistant is not configured.",
            Self::Network(_) => {
                "Could not reach the AI assistant. Please check your internet connection."
            }
            Self::RateLimited => "The AI assistant is busy. Please try again shortly.",
            Self::Api { .. } | Self::JsonParse(_) | Self::EmptyReply => {
                "The AI assistant could not answer right now."
            }
        }
    }

    /// Returns whether a user-initiated retry may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited | Self::EmptyReply => true,
            Self::Api { status, .. } => *status >= 500,
            Self::MissingApiKey(_) | Self::JsonParse(_) => false,
        }
    }
}

impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for advisor operations.
pub type Result<T> = std::result::Result<T, AdvisorError>;
