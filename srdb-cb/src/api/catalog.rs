//! Catalog table views
//!
//! The HTML pages and the JSON API share one query model: every request
//! rebuilds its view from the installed catalog rows.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use srdb_common::catalog::{Catalog, CatalogSnapshot};
use srdb_common::view_model::{featured_rows, DisplayRow};

use super::error::{ApiError, PageError};
use super::query::{CatalogQuery, TableRequest};
use crate::render::{self, catalog::TableContext, catalog::CATALOG_COLUMNS, catalog::FEATURED_COLUMNS};
use crate::AppState;

const CATALOG_HEADING: &str = "Song Catalog";

/// Installed catalog, or the page to show instead
async fn ready_catalog(state: &AppState, title: &str) -> Result<Arc<Catalog>, Response> {
    match state.store.snapshot().await {
        CatalogSnapshot::Ready(catalog) => Ok(catalog),
        CatalogSnapshot::Failed(err) => {
            let panel = render::load_error_panel(&err, &state.config.data.base);
            Err((StatusCode::SERVICE_UNAVAILABLE, Html(render::page(title, &panel))).into_response())
        }
        CatalogSnapshot::Loading => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Html(render::page(title, &render::loading_panel())),
        )
            .into_response()),
    }
}

fn table_page(
    state: &AppState,
    path: &str,
    heading: &str,
    columns: &[render::catalog::Column],
    request: &TableRequest,
    rows: &[DisplayRow],
) -> Html<String> {
    let view = request.view(rows);
    let ctx = TableContext {
        path,
        heading,
        columns,
        request,
        config: &state.config,
    };
    Html(render::page(heading, &render::catalog::table_section(&ctx, &view.page())))
}

/// GET /
///
/// Query: `q`, `sort`, `order`, `page` (1-indexed), `page_size`, `layout`
pub async fn catalog_page(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Response, PageError> {
    let request = query.resolve(&state.config)?;
    let catalog = match ready_catalog(&state, CATALOG_HEADING).await {
        Ok(catalog) => catalog,
        Err(response) => return Ok(response),
    };

    Ok(table_page(
        &state,
        "/",
        CATALOG_HEADING,
        CATALOG_COLUMNS,
        &request,
        catalog.display_rows(),
    )
    .into_response())
}

/// GET /featured
///
/// Songs whose performers match the configured featured performer
pub async fn featured_page(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Response, PageError> {
    let request = query.resolve(&state.config)?;
    let featured = &state.config.featured;
    let catalog = match ready_catalog(&state, &featured.heading).await {
        Ok(catalog) => catalog,
        Err(response) => return Ok(response),
    };

    let rows = featured_rows(catalog.display_rows(), &featured.performer_match);
    Ok(table_page(
        &state,
        "/featured",
        &featured.heading,
        FEATURED_COLUMNS,
        &request,
        &rows,
    )
    .into_response())
}

/// Catalog page as JSON
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub rows: Vec<DisplayRow>,
    /// Page number (1-indexed, 0 when there are no rows)
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub showing_all: bool,
    pub query: String,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// GET /api/catalog
///
/// Same query parameters as the catalog page
pub async fn catalog_json(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let request = query.resolve(&state.config)?;
    let catalog = match state.store.snapshot().await {
        CatalogSnapshot::Ready(catalog) => catalog,
        CatalogSnapshot::Failed(err) => return Err(ApiError::Unavailable(err.to_string())),
        CatalogSnapshot::Loading => {
            return Err(ApiError::Unavailable("Catalog is still loading".to_string()))
        }
    };

    let view = request.view(catalog.display_rows());
    let page = view.page();
    let info = &page.info;

    Ok(Json(CatalogResponse {
        rows: page.rows.iter().map(|row| (*row).clone()).collect(),
        page: if info.page_count == 0 { 0 } else { info.page + 1 },
        page_size: info.page_size,
        total_rows: info.total,
        total_pages: info.page_count,
        showing_all: info.showing_all,
        query: page.search.clone(),
        sort: page.sort.map(|s| s.column.as_str().to_string()),
        order: page.sort.map(|s| s.direction.as_str().to_string()),
    }))
}
