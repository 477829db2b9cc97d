//! `/api` routes, one module per feature area.

pub mod chat;
pub mod generate;
pub mod keys;
pub mod models;
pub mod summarize;
pub mod system;
pub mod transcribe;
pub mod vision;

use axum::Router;

use crate::state::AppState;

/// All API routes, mounted at the root (paths carry their `/api` prefix).
pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(keys::routes())
        .merge(models::routes())
        .merge(chat::routes())
        .merge(generate::routes())
        .merge(vision::routes())
        .merge(transcribe::routes())
        .merge(summarize::routes())
        .merge(system::routes())
        .with_state(state)
}
