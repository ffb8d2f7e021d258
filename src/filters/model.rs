//! # Filter Model

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::placeholder::{self, EvaluationContext, RenderResult};

/// Persisted query of a filter.
///
/// On the wire an object is a `Document` and a string is a `Template`. The
/// template form exists for placeholders in non-string positions, such as
/// `{"user_id": {{ current_user }}}`, which a JSON object cannot hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredQuery {
    /// Non-empty JSON object, placeholders inside string values
    Document(Map<String, Value>),

    /// Raw JSON template text
    Template(String),
}

impl StoredQuery {
    /// Resolve placeholders against `ctx`
    pub fn render(&self, ctx: &EvaluationContext, deadline: Option<Instant>) -> RenderResult<Value> {
        match self {
            StoredQuery::Document(map) => {
                placeholder::render_before(&Value::Object(map.clone()), ctx, deadline)
            }
            StoredQuery::Template(text) => placeholder::render_text_before(text, ctx, deadline),
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self, StoredQuery::Template(_))
    }
}

/// A saved search filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub id: Uuid,
    pub name: String,
    pub query: StoredQuery,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Filter {
    /// New filter with a fresh id, stamped now
    pub fn new(name: impl Into<String>, query: StoredQuery) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            query,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the query and bump `updated_at`
    pub fn replace_query(&mut self, query: StoredQuery) {
        self.query = query;
        self.updated_at = Utc::now().max(self.created_at);
    }

    pub fn to_list_item(&self) -> FilterListItem {
        FilterListItem {
            id: self.id,
            name: self.name.clone(),
            query: self.query.clone(),
        }
    }
}

/// Filter as shown in listings, without timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterListItem {
    pub id: Uuid,
    pub name: String,
    pub query: StoredQuery,
}

/// Listing order: oldest first, ties broken by id
pub(crate) fn sort_for_listing(filters: &mut [&Filter]) {
    filters.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}
