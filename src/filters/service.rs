//! # Filter Service
//!
//! Use cases over the repository: input validation, not-found translation and
//! the apply operation that renders a stored query.
//!
//! Validation runs before any storage access, so a rejected create or update
//! leaves the store untouched.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use uuid::Uuid;

use crate::placeholder::EvaluationContext;

use super::errors::{FilterError, FilterResult};
use super::model::{Filter, FilterListItem, StoredQuery};
use super::repository::FilterRepository;

/// Default budget for a single render
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(1);

/// Filter use cases
pub struct FilterService {
    repo: Arc<dyn FilterRepository>,
    time_zone: Tz,
    acting_user_id: i64,
    render_timeout: Duration,
}

impl FilterService {
    /// Create a service rendering in `time_zone` on behalf of `acting_user_id`
    pub fn new(
        repo: Arc<dyn FilterRepository>,
        time_zone: Tz,
        acting_user_id: i64,
    ) -> FilterResult<Self> {
        if acting_user_id <= 0 {
            return Err(FilterError::Internal(format!(
                "acting user id must be > 0, got {}",
                acting_user_id
            )));
        }
        Ok(Self {
            repo,
            time_zone,
            acting_user_id,
            render_timeout: DEFAULT_RENDER_TIMEOUT,
        })
    }

    /// Override the budget [`render_deadline`](Self::render_deadline) grants
    pub fn with_render_timeout(mut self, render_timeout: Duration) -> Self {
        self.render_timeout = render_timeout;
        self
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn acting_user_id(&self) -> i64 {
        self.acting_user_id
    }

    /// Context for a render evaluated at `instant`
    pub fn context_at(&self, instant: DateTime<Utc>) -> EvaluationContext {
        EvaluationContext::new(instant, self.time_zone, self.acting_user_id)
    }

    /// Create a filter
    pub fn create(&self, name: &str, query: Value) -> FilterResult<Filter> {
        let name = validate_name(name)?;
        let query = self.validate_query(query)?;

        let filter = self.repo.create(name, query)?;
        tracing::info!(filter_id = %filter.id, name = %filter.name, "filter created");
        Ok(filter)
    }

    /// All filters, without timestamps
    pub fn list(&self) -> FilterResult<Vec<FilterListItem>> {
        Ok(self.repo.list()?)
    }

    /// Get a filter by id
    pub fn get(&self, id: Uuid) -> FilterResult<Filter> {
        validate_id(id)?;
        Ok(self.repo.get(id)?)
    }

    /// Replace a filter's query
    pub fn update(&self, id: Uuid, query: Value) -> FilterResult<Filter> {
        validate_id(id)?;
        let query = self.validate_query(query)?;

        let filter = self.repo.update(id, query)?;
        tracing::info!(filter_id = %id, "filter updated");
        Ok(filter)
    }

    /// Delete a filter
    pub fn delete(&self, id: Uuid) -> FilterResult<()> {
        validate_id(id)?;
        self.repo.delete(id)?;
        tracing::info!(filter_id = %id, "filter deleted");
        Ok(())
    }

    /// Deadline for a render requested now.
    ///
    /// Callers take this when a request arrives, before any queueing, and
    /// pass it to [`apply`](Self::apply).
    pub fn render_deadline(&self) -> Instant {
        Instant::now() + self.render_timeout
    }

    /// Render a stored filter's query at the current moment
    pub fn apply(&self, id: Uuid, deadline: Option<Instant>) -> FilterResult<Value> {
        self.apply_at(id, Utc::now(), deadline)
    }

    /// Render a stored filter's query at `instant`, unless `deadline` passed
    /// before rendering started
    pub fn apply_at(
        &self,
        id: Uuid,
        instant: DateTime<Utc>,
        deadline: Option<Instant>,
    ) -> FilterResult<Value> {
        validate_id(id)?;
        let filter = self.repo.get(id)?;
        self.render(&filter.query, instant, deadline).inspect_err(|e| {
            tracing::warn!(filter_id = %id, error = %e, "filter apply failed");
        })
    }

    /// Render a query that is not stored
    pub fn preview(
        &self,
        query: Value,
        instant: DateTime<Utc>,
        deadline: Option<Instant>,
    ) -> FilterResult<Value> {
        let query = parse_query(query)?;
        self.render(&query, instant, deadline)
    }

    fn render(
        &self,
        query: &StoredQuery,
        instant: DateTime<Utc>,
        deadline: Option<Instant>,
    ) -> FilterResult<Value> {
        let ctx = self.context_at(instant);
        Ok(query.render(&ctx, deadline)?)
    }

    /// Shape check plus a trial render, so broken templates are rejected up
    /// front instead of at apply time
    fn validate_query(&self, query: Value) -> FilterResult<StoredQuery> {
        let query = parse_query(query)?;
        let rendered = self.render(&query, Utc::now(), None)?;
        match rendered.as_object() {
            Some(map) if !map.is_empty() => Ok(query),
            Some(_) => Err(FilterError::validation("query must not be an empty object")),
            None => Err(FilterError::validation(
                "query template must render to a JSON object",
            )),
        }
    }
}

fn validate_id(id: Uuid) -> FilterResult<()> {
    if id.is_nil() {
        return Err(FilterError::validation("invalid id"));
    }
    Ok(())
}

fn validate_name(name: &str) -> FilterResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FilterError::validation("name is required"));
    }
    Ok(name)
}

/// Classify a caller-submitted query
fn parse_query(query: Value) -> FilterResult<StoredQuery> {
    match query {
        Value::Null => Err(FilterError::validation("query is required")),
        Value::Object(map) if map.is_empty() => Err(FilterError::validation(
            "query must not be an empty object",
        )),
        Value::Object(map) => Ok(StoredQuery::Document(map)),
        Value::String(text) if text.trim().is_empty() => {
            Err(FilterError::validation("query template must not be empty"))
        }
        Value::String(text) => Ok(StoredQuery::Template(text)),
        _ => Err(FilterError::validation("query must be a JSON object")),
    }
}
