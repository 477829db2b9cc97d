//! Model catalog management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use tracing::info;

use aiplex_core::{ModelEntry, NewModel};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/models", get(list_models).post(add_model))
        .route("/api/models/{id}", delete(delete_model))
}

async fn list_models(State(state): State<AppState>) -> Json<Vec<ModelEntry>> {
    Json(state.catalog.list().await)
}

async fn add_model(
    State(state): State<AppState>,
    Json(model): Json<NewModel>,
) -> (StatusCode, Json<ModelEntry>) {
    let entry = state.catalog.add(model).await;
    info!(id = %entry.id, provider = %entry.provider, kind = %entry.kind, "model added");
    (StatusCode::CREATED, Json(entry))
}

async fn delete_model(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.catalog.remove(&id).await;
    StatusCode::NO_CONTENT
}
