//! srdb-cb library - Catalog Browser
//!
//! Read-only web browser for the song rights catalog: a sortable, searchable,
//! paginated table of every song play plus a multi-format report viewer.

use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use srdb_common::catalog::{CatalogLoader, CatalogStore, InstallOutcome};
use srdb_common::config::CatalogConfig;
use srdb_common::report::ReportCache;
use srdb_common::source::{is_http_base, DataSource};

pub mod api;
pub mod render;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Currently displayed catalog
    pub store: Arc<CatalogStore>,
    /// Reports populated since the last reload
    pub reports: Arc<ReportCache>,
    /// Where the YAML files come from
    pub source: Arc<dyn DataSource>,
    pub loader: CatalogLoader,
    pub config: Arc<CatalogConfig>,
}

impl AppState {
    /// Create new application state; no data is loaded yet
    pub fn new(source: Arc<dyn DataSource>, config: CatalogConfig) -> Self {
        let loader = CatalogLoader::new(Arc::clone(&source), config.data.files.clone());
        Self {
            store: Arc::new(CatalogStore::new()),
            reports: Arc::new(ReportCache::new()),
            source,
            loader,
            config: Arc::new(config),
        }
    }

    /// Load the catalog and drop cached reports
    ///
    /// Concurrent reloads never clobber each other: only the most recently
    /// started load that finishes is installed.
    pub async fn reload(&self) -> InstallOutcome {
        let outcome = self.store.reload(&self.loader).await;
        if outcome == InstallOutcome::Installed {
            self.reports.clear().await;
        }
        info!(outcome = ?outcome, "Catalog reload finished");
        outcome
    }

    /// Local data directory, when the data base is not a URL
    pub fn data_dir(&self) -> Option<PathBuf> {
        let base = &self.config.data.base;
        (!is_http_base(base)).then(|| PathBuf::from(base))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let pages = Router::new()
        .route("/", get(api::catalog_page))
        .route("/featured", get(api::featured_page))
        .route("/reports", get(api::reports_index))
        .route("/reports/:kind", get(api::report_page))
        .route("/static/site.css", get(api::serve_css));

    let json = Router::new()
        .route("/api/catalog", get(api::catalog_json))
        .route("/api/reports/:kind", get(api::report_raw))
        .route("/api/reload", post(api::reload_catalog))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    let mut router = Router::new().merge(pages).merge(json);

    // The YAML files stay fetchable by relative path when served from disk
    if let Some(dir) = state.data_dir() {
        router = router.nest_service("/data", ServeDir::new(dir));
    }

    router.with_state(state).layer(TraceLayer::new_for_http())
}
