//! Usage counters and health check.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use aiplex_core::UsageStats;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/usage-stats", get(usage_stats))
        // The browser UI polls this alias
        .route("/api/usage", get(usage_stats))
        .route("/api/health", get(health))
}

async fn usage_stats(State(state): State<AppState>) -> Json<UsageStats> {
    Json(state.usage.snapshot().await)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}
