//! HTTP error type — every handler failure becomes `{"error", "details"?}`.

use aiplex_providers::ProviderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid input or unknown model (400).
    #[error("{0}")]
    BadRequest(String),

    /// The selected provider has no implementation for the task (501).
    #[error("{0}")]
    NotImplemented(String),

    /// The upstream call failed (500). `details` carries the cause.
    #[error("{message}: {details}")]
    Upstream { message: String, details: String },

    /// Local failure while handling the request (500).
    #[error("{message}: {details}")]
    Internal { message: String, details: String },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented(message.into())
    }

    /// Wrap a provider failure under a task-specific message.
    pub fn upstream(message: impl Into<String>, err: &ProviderError) -> Self {
        Self::Upstream {
            message: message.into(),
            details: err.details(),
        }
    }

    pub fn internal(message: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.into(),
            details: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Upstream { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, details) = match &self {
            Self::BadRequest(message) | Self::NotImplemented(message) => (message.as_str(), None),
            Self::Upstream { message, details } | Self::Internal { message, details } => {
                (message.as_str(), Some(details.as_str()))
            }
        };
        let body = ErrorBody { error, details };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_has_no_details() {
        let (status, body) =
            body_json(ApiError::bad_request("Invalid model selected for chat")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Invalid model selected for chat"}));
    }

    #[tokio::test]
    async fn test_upstream_carries_details() {
        let err = ProviderError::Api {
            status: 503,
            body: "Model is loading".into(),
        };
        let (status, body) =
            body_json(ApiError::upstream("Failed to generate response", &err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate response");
        assert_eq!(body["details"], "Model is loading");
    }

    #[tokio::test]
    async fn test_not_implemented_status() {
        let (status, _) = body_json(ApiError::not_implemented(
            "Video generation not implemented for this provider",
        ))
        .await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }
}
