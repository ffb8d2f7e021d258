//! Health HTTP Routes

use axum::{http::StatusCode, routing::get, Router};

/// Liveness check at `/healthz`
pub fn health_routes() -> Router {
    Router::new().route("/healthz", get(health_handler))
}

async fn health_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}
