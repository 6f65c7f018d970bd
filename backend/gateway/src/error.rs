//! Maps runtime errors onto user-visible HTTP failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use cardforge_core::CardError;

/// Wrapper giving [`CardError`] an HTTP shape.
pub struct ApiError(pub CardError);

impl From<CardError> for ApiError {
    fn from(err: CardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            CardError::EmptyUpload => (StatusCode::BAD_REQUEST, self.0.to_string()),
            CardError::NotFound(_) => (StatusCode::NOT_FOUND, "Card not found".to_string()),
            CardError::Provider { provider, message } => {
                error!(provider = %provider, message = %message, "External service failure");
                (StatusCode::BAD_GATEWAY, self.0.to_string())
            }
            other => {
                error!(error = %other, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
