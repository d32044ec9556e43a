//! Error body returned by the HTTP surface.

use crate::utils::error::PriceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body did not deserialize into the expected shape.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Price(#[from] PriceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 所有單一請求的失敗都是 400，並附上原因
        let message = match &self {
            ApiError::InvalidRequest(msg) => {
                tracing::debug!("Rejected request body: {}", msg);
                msg.clone()
            }
            ApiError::Price(e) if e.is_client_error() => {
                tracing::debug!("Request failed ({:?}): {}", e.category(), e);
                e.to_string()
            }
            ApiError::Price(e) => {
                tracing::error!("Unexpected failure while serving a request: {}", e);
                e.to_string()
            }
        };

        let body = Json(json!({ "detail": message }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
