//! # API Errors
//!
//! Maps domain errors onto HTTP status codes. Server-side failures are logged
//! and answered with a generic body so internal detail never reaches clients.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::filters::FilterError;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Malformed path parameter or request body
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Filter(#[from] FilterError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Filter(FilterError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Filter(FilterError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Filter(FilterError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Filter(FilterError::DeadlineExceeded) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Filter(FilterError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client
    fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Filter(FilterError::Validation(msg)) => msg.clone(),
            ApiError::Filter(FilterError::NotFound) => "not found".to_string(),
            ApiError::Filter(FilterError::Conflict(msg)) => msg.clone(),
            ApiError::Filter(FilterError::DeadlineExceeded) => "render deadline exceeded".to_string(),
            ApiError::Filter(FilterError::Internal(_)) => "internal error".to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.public_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
