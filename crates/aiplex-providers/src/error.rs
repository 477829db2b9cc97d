//! Provider error type.

use aiplex_core::ModelKind;
use thiserror::Error;

/// Errors from a single upstream provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No usable API key in the key store.
    #[error("No API key configured for {0}")]
    MissingApiKey(String),

    /// The provider has no implementation for this task.
    #[error("{provider} does not support {task}")]
    Unsupported { provider: String, task: ModelKind },

    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The provider answered 2xx but the body was not what we expect.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local file handling (staging uploads, reading audio).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Request URLs may carry credentials, so they never reach messages.
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err.without_url())
    }
}

impl ProviderError {
    /// A 2xx body that failed to decode.
    pub(crate) fn invalid_body(err: reqwest::Error) -> Self {
        ProviderError::InvalidResponse(err.without_url().to_string())
    }

    /// Text suitable for the `details` field of an error response.
    ///
    /// For upstream API errors this is the raw response body.
    pub fn details(&self) -> String {
        match self {
            ProviderError::Api { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_prefers_api_body() {
        let err = ProviderError::Api {
            status: 503,
            body: "{\"error\":\"Model is loading\"}".into(),
        };
        assert_eq!(err.details(), "{\"error\":\"Model is loading\"}");
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_details_falls_back_to_display() {
        let err = ProviderError::MissingApiKey("OpenAI".into());
        assert_eq!(err.details(), "No API key configured for OpenAI");

        let empty = ProviderError::Api {
            status: 500,
            body: String::new(),
        };
        assert_eq!(empty.details(), "API returned 500: ");
    }

    #[test]
    fn test_unsupported_message() {
        let err = ProviderError::Unsupported {
            provider: "ElevenLabs".into(),
            task: ModelKind::Image,
        };
        assert_eq!(err.to_string(), "ElevenLabs does not support image");
    }
}
