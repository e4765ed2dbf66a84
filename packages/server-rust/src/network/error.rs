//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use placement_core::{QueryError, ValidationError};
use serde_json::json;
use tracing::{error, warn};

/// Errors returned by the placement API handlers.
///
/// Rendered as `{"error": "<message>"}` with:
///
/// - `400` for malformed parameters or invalid documents
/// - `404` for unknown ids
/// - `502` when the document store fails
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("document store error: {0}")]
    Upstream(#[from] anyhow::Error),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Validation(e) => ApiError::Validation(e),
            QueryError::Upstream(e) => ApiError::Upstream(e),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Upstream(anyhow::Error::new(err).context("stored document does not match schema"))
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Upstream(e) => error!(error = %format!("{e:#}"), "request failed"),
            other => warn!(error = %other, status = status.as_u16(), "request rejected"),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
