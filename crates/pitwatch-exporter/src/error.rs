//! HTTP-facing errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    /// The metrics registry could not be built or encoded.
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl IntoResponse for ExporterError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Metrics(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics error: {e}")),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
