//! search-filter - saved search filters with date and identity placeholders
//!
//! Filters are JSON query documents stored by name. Placeholders such as
//! `{{ today-7d }}` and `{{ current_user }}` are resolved each time a filter
//! is applied.

pub mod cli;
pub mod config;
pub mod filters;
pub mod http_server;
pub mod observability;
pub mod placeholder;
