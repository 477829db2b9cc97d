//! Summarize a transcription with a chat model named by free-form string.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use aiplex_core::ModelKind;
use aiplex_providers::registry::resolve_model_string;
use aiplex_providers::{chat_provider, ChatPrompt};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const SUMMARY_MAX_TOKENS: u32 = 500;
const SYSTEM_PROMPT: &str = "You summarize transcripts. Reply with a concise summary \
                             of the key points, decisions and action items.";

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub transcription: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub cost: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/summarize", post(summarize))
}

async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    const FAILED: &str = "Failed to generate summary";

    if req.transcription.trim().is_empty() {
        return Err(ApiError::bad_request("No transcription provided"));
    }

    let model_name = req
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let (spec, upstream_model) = resolve_model_string(&model_name)
        .filter(|(spec, _)| spec.supports(ModelKind::Text))
        .ok_or_else(|| ApiError::bad_request("Unsupported summarization model"))?;

    let upstream = state
        .upstream(spec)
        .await
        .map_err(|e| ApiError::upstream(FAILED, &e))?;
    let provider = chat_provider(upstream).map_err(|e| ApiError::upstream(FAILED, &e))?;

    let prompt = ChatPrompt {
        system: Some(SYSTEM_PROMPT.to_string()),
        message: req.transcription,
        max_tokens: Some(SUMMARY_MAX_TOKENS),
    };
    let summary = provider.chat(&upstream_model, &prompt).await.map_err(|e| {
        error!(provider = spec.name, model = %upstream_model, error = %e, "summary failed");
        ApiError::upstream(FAILED, &e)
    })?;

    let cost = spec.cost(ModelKind::Text).unwrap_or_default();
    state.usage.record(&model_name, cost).await;
    info!(provider = spec.name, model = %model_name, "summary complete");

    Ok(Json(SummarizeResponse { summary, cost }))
}
