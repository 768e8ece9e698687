use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use newslens_common::NewsLensError;
use newslens_live::LiveError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the JSON API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Live(#[from] LiveError),

    #[error(transparent)]
    Backend(#[from] NewsLensError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Live(LiveError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Live(_) | ApiError::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "success": false, "error": self.to_string() }))).into_response()
    }
}
