//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use srdb_common::catalog::CatalogSnapshot;

use crate::AppState;

/// Returns status, module name, version and whether a catalog is installed
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// "loading", "ready" or "failed"
    pub catalog: String,
}

/// GET /health
///
/// Answers even when the catalog failed to load, so monitoring can tell a
/// dead process from bad data.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog = match state.store.snapshot().await {
        CatalogSnapshot::Loading => "loading",
        CatalogSnapshot::Ready(_) => "ready",
        CatalogSnapshot::Failed(_) => "failed",
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "srdb-cb".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog: catalog.to_string(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
