//! Static asset serving

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

const SITE_CSS: &str = include_str!("../../ui/site.css");

/// GET /static/site.css
pub async fn serve_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        SITE_CSS,
    )
        .into_response()
}
