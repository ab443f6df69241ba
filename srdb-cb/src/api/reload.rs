//! Catalog reload endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use srdb_common::catalog::{CatalogSnapshot, InstallOutcome};

use super::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    /// "installed" or "superseded"
    pub outcome: String,
    pub generation: u64,
    pub rows: usize,
}

/// POST /api/reload
///
/// Re-reads every data file. A load overtaken by a newer one reports
/// `superseded`; a failed load is installed (the views show its error) and
/// answered with 503.
pub async fn reload_catalog(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let outcome = state.reload().await;
    let generation = state.store.generation().await;

    let rows = match state.store.snapshot().await {
        CatalogSnapshot::Ready(catalog) => catalog.display_rows().len(),
        CatalogSnapshot::Failed(err) if outcome == InstallOutcome::Installed => {
            return Err(ApiError::Unavailable(err.to_string()));
        }
        _ => 0,
    };

    let outcome = match outcome {
        InstallOutcome::Installed => "installed",
        InstallOutcome::Superseded => "superseded",
    };

    Ok(Json(ReloadResponse {
        outcome: outcome.to_string(),
        generation,
        rows,
    }))
}
