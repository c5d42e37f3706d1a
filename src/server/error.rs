use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;

use crate::error::DetectorError;

/// Any failure inside a handler. Always surfaces as HTTP 500 `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub String);

impl From<DetectorError> for ApiError {
    fn from(err: DetectorError) -> Self {
        Self(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        let body = serde_json::json!({ "error": self.0 });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
