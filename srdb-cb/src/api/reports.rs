//! Report viewer endpoints
//!
//! Reports are populated on first view and cached until the next reload, so
//! switching between formats only re-renders.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use srdb_common::report::{Report, ReportFormat, ReportKind};

use super::error::{ApiError, PageError};
use crate::render;
use crate::AppState;

/// Query parameters for report viewing
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// "html" (default), "text", "json" or "yaml"
    pub format: Option<String>,
}

impl ReportQuery {
    fn format(&self) -> srdb_common::Result<ReportFormat> {
        match self.format.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            Some(format) => format.parse(),
            None => Ok(ReportFormat::default()),
        }
    }
}

async fn cached_report(state: &AppState, kind: ReportKind) -> Arc<Report> {
    state
        .reports
        .get_or_populate(kind, state.source.as_ref(), &state.config.data.files)
        .await
}

/// GET /reports
pub async fn reports_index() -> Html<String> {
    Html(render::page("Reports", &render::reports::reports_index()))
}

/// GET /reports/:kind
///
/// Report embedded in a page with links to the other formats
pub async fn report_page(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Html<String>, PageError> {
    let kind: ReportKind = kind.parse()?;
    let format = query.format()?;
    let report = cached_report(&state, kind).await;

    Ok(Html(render::page(
        kind.title(),
        &render::reports::report_view(&report, format),
    )))
}

/// GET /api/reports/:kind
///
/// Rendered report with a matching content type
pub async fn report_raw(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let kind: ReportKind = kind.parse()?;
    let format = query.format()?;
    let report = cached_report(&state, kind).await;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, format.content_type())],
        report.render(format),
    )
        .into_response())
}
