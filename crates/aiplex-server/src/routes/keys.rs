//! API key management. Values are write-only: listings never include them.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use tracing::info;

use aiplex_core::{KeySummary, NewApiKey};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/keys", get(list_keys).post(add_key))
        .route("/api/keys/{id}", delete(delete_key))
}

async fn list_keys(State(state): State<AppState>) -> Json<Vec<KeySummary>> {
    Json(state.keys.list().await)
}

async fn add_key(
    State(state): State<AppState>,
    Json(key): Json<NewApiKey>,
) -> (StatusCode, Json<KeySummary>) {
    let summary = state.keys.add(key).await;
    info!(id = %summary.id, name = %summary.name, "api key stored");
    (StatusCode::CREATED, Json(summary))
}

async fn delete_key(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let removed = state.keys.remove(&id).await;
    info!(id = %id, removed, "api key delete");
    StatusCode::NO_CONTENT
}
