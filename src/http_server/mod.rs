//! # HTTP Server Module
//!
//! JSON API over the filter service.
//!
//! # Endpoints
//!
//! - `POST /filters`, `GET /filters` - create and list
//! - `GET|PUT|DELETE /filters/:id` - read, replace query, delete
//! - `GET /filters/:id/apply` - render the stored query now
//! - `GET /healthz` - liveness, answers 204

pub mod config;
pub mod errors;
pub mod filter_routes;
pub mod health_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
