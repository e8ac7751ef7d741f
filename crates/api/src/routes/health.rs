//! `GET /health`: liveness plus the two stores every page depends on.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    /// `"ok"` when both stores are reachable, otherwise `"degraded"`.
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    /// The media root exists and is a directory.
    pub media_storage: bool,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = coffer_db::health_check(&state.pool).await.is_ok();
    let media_storage = tokio::fs::metadata(state.media.root())
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);

    if !database || !media_storage {
        tracing::warn!(database, media_storage, "Health check degraded");
    }

    Json(Health {
        status: if database && media_storage { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        media_storage,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
