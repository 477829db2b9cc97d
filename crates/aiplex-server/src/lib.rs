//! Aiplex HTTP server.
//!
//! Serves the JSON API under `/api`, generated media under `/uploads`, and
//! the browser UI's static assets for every other path.
//!
//! # Architecture
//!
//! - [`state::AppState`] — catalog, key store, usage counters, HTTP client
//! - [`routes`] — one module per feature area, merged by [`routes::configure`]
//! - [`error::ApiError`] — handler errors rendered as `{"error", "details"?}`
//! - [`media`] — writes generated bytes to the uploads directory

pub mod error;
pub mod media;
pub mod routes;
pub mod state;

use std::io;

use anyhow::{anyhow, Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use aiplex_core::config::{Config, ServerConfig};
use aiplex_core::utils::expand_home;

pub use error::ApiError;
pub use state::AppState;

/// Assemble the full application: API routes, uploads, static UI, CORS and
/// the request body limit.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let uploads = ServeDir::new(&state.uploads_dir);
    let public = ServeDir::new(expand_home(&server.public_dir));

    routes::configure(state)
        .nest_service(media::UPLOADS_ROUTE, uploads)
        .fallback_service(public)
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(cors)
}

/// Bind `host:port`, moving to the next port while the current one is in
/// use, for at most `attempts` ports.
pub async fn bind_with_fallback(host: &str, port: u16, attempts: u16) -> Result<TcpListener> {
    let attempts = attempts.max(1);
    let mut tried = 0;

    for offset in 0..attempts {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        tried += 1;
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                warn!(port = candidate, "Port {} is busy, trying the next one", candidate);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to bind {host}:{candidate}"));
            }
        }
    }

    Err(anyhow!(
        "no free port on {host}: tried {tried} port(s) starting at {port}"
    ))
}

/// Run the server until Ctrl+C.
pub async fn serve(config: Config) -> Result<()> {
    let server = &config.server;

    let uploads_dir = expand_home(&server.uploads_dir);
    tokio::fs::create_dir_all(&uploads_dir)
        .await
        .with_context(|| format!("failed to create uploads directory: {}", uploads_dir.display()))?;

    let state = AppState::new(&config).context("failed to initialize application state")?;
    let app = build_router(state, server);

    let listener = bind_with_fallback(&server.host, server.port, server.port_attempts).await?;
    let addr = listener.local_addr()?;
    info!("Server is running on {}", addr);
    info!("Uploads directory: {}", uploads_dir.display());
    info!("Static assets: {}", server.public_dir);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        // Without a signal handler, keep serving
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}
