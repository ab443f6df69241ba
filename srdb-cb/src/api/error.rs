//! HTTP error responses
//!
//! JSON endpoints answer with `{ "error": message }`; pages answer with the
//! same status and an HTML error panel.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::render;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// No catalog to show: still loading, or the last load failed
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<srdb_common::Error> for ApiError {
    fn from(e: srdb_common::Error) -> Self {
        use srdb_common::Error;
        match e {
            Error::InvalidInput(_) => ApiError::BadRequest(e.to_string()),
            Error::NotFound(_) => ApiError::NotFound(e.to_string()),
            Error::Fetch { .. } | Error::Parse { .. } | Error::EmptyCriticalData { .. } => {
                ApiError::Unavailable(e.to_string())
            }
            Error::Config(_) | Error::Io(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

/// Error shown as a full HTML page
#[derive(Debug)]
pub struct PageError(pub ApiError);

impl From<ApiError> for PageError {
    fn from(e: ApiError) -> Self {
        PageError(e)
    }
}

impl From<srdb_common::Error> for PageError {
    fn from(e: srdb_common::Error) -> Self {
        PageError(e.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let title = status.canonical_reason().unwrap_or("Error");
        let body = render::page(title, &render::message_panel(title, &self.0.to_string()));
        (status, Html(body)).into_response()
    }
}
