//! Filter HTTP Routes
//!
//! CRUD endpoints for saved filters plus `/filters/:id/apply`, which renders
//! the stored query at the moment of the request. Its render budget starts
//! when the request arrives, so time spent waiting for a blocking worker
//! counts against it.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::errors::{ApiError, ApiResult};
use crate::filters::{Filter, FilterError, FilterListItem, FilterResult, FilterService};

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct CreateFilterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub query: Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFilterRequest {
    #[serde(default)]
    pub query: Value,
}

// ==================
// Filter Routes
// ==================

/// Create filter routes
pub fn filter_routes(service: Arc<FilterService>) -> Router {
    Router::new()
        .route("/filters", get(list_filters_handler).post(create_filter_handler))
        .route(
            "/filters/:id",
            get(get_filter_handler)
                .put(update_filter_handler)
                .delete(delete_filter_handler),
        )
        .route("/filters/:id/apply", get(apply_filter_handler))
        .with_state(service)
}

// ==================
// Helper Functions
// ==================

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid id '{}'", raw)))
}

/// Service calls may touch the disk, so they run off the async workers
async fn run_blocking<T, F>(service: Arc<FilterService>, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&FilterService) -> FilterResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| FilterError::Internal(format!("worker task failed: {}", e)))?
        .map_err(ApiError::from)
}

// ==================
// Handlers
// ==================

async fn create_filter_handler(
    State(service): State<Arc<FilterService>>,
    body: Result<Json<CreateFilterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Filter>)> {
    let Json(request) = body?;
    let filter = run_blocking(service, move |svc| svc.create(&request.name, request.query)).await?;
    Ok((StatusCode::CREATED, Json(filter)))
}

async fn list_filters_handler(
    State(service): State<Arc<FilterService>>,
) -> ApiResult<Json<Vec<FilterListItem>>> {
    let filters = run_blocking(service, |svc| svc.list()).await?;
    Ok(Json(filters))
}

async fn get_filter_handler(
    State(service): State<Arc<FilterService>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Filter>> {
    let id = parse_id(&id)?;
    let filter = run_blocking(service, move |svc| svc.get(id)).await?;
    Ok(Json(filter))
}

async fn update_filter_handler(
    State(service): State<Arc<FilterService>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateFilterRequest>, JsonRejection>,
) -> ApiResult<Json<Filter>> {
    let id = parse_id(&id)?;
    let Json(request) = body?;
    let filter = run_blocking(service, move |svc| svc.update(id, request.query)).await?;
    Ok(Json(filter))
}

async fn delete_filter_handler(
    State(service): State<Arc<FilterService>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    run_blocking(service, move |svc| svc.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_filter_handler(
    State(service): State<Arc<FilterService>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let deadline = service.render_deadline();
    let rendered = run_blocking(service, move |svc| svc.apply(id, Some(deadline))).await?;
    Ok(Json(rendered))
}
