//! Chat: one user message in, one reply out.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use aiplex_core::ModelKind;
use aiplex_providers::registry::{find_by_name, resolve_upstream_model};
use aiplex_providers::{chat_provider, ChatPrompt, FALLBACK_CHAT_COST};

use crate::error::ApiError;
use crate::state::AppState;

const FAILED: &str = "Failed to generate response";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub model_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub cost: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    // Chat accepts any entry by id, whatever its type
    let model = state
        .catalog
        .get(&req.model_id)
        .await
        .ok_or_else(|| ApiError::bad_request("Invalid model selected for chat"))?;

    let spec = find_by_name(&model.provider).filter(|s| s.supports(ModelKind::Text));

    let (response, cost) = match spec {
        Some(spec) => {
            let upstream = state
                .upstream(spec)
                .await
                .map_err(|e| ApiError::upstream(FAILED, &e))?;
            let provider = chat_provider(upstream).map_err(|e| ApiError::upstream(FAILED, &e))?;
            let upstream_model = resolve_upstream_model(&model, spec);

            let reply = provider
                .chat(&upstream_model, &ChatPrompt::user(req.message))
                .await
                .map_err(|e| {
                    error!(provider = spec.name, model = %upstream_model, error = %e, "chat failed");
                    ApiError::upstream(FAILED, &e)
                })?;
            (reply, spec.cost(ModelKind::Text).unwrap_or(FALLBACK_CHAT_COST))
        }
        None => (
            format!(
                "Chat response from {} ({}) - Not yet implemented",
                model.name, model.provider
            ),
            FALLBACK_CHAT_COST,
        ),
    };

    state.usage.record(&model.name, cost).await;
    info!(model = %model.name, provider = %model.provider, cost, "chat complete");

    Ok(Json(ChatResponse { response, cost }))
}
