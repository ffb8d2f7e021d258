//! # Saved Search Filters
//!
//! Named query documents that may embed placeholders, their storage, and the
//! use cases built on them.

pub mod errors;
pub mod file_store;
pub mod model;
pub mod repository;
pub mod service;

pub use errors::{FilterError, FilterResult, RepositoryError, RepositoryResult};
pub use file_store::FileFilterRepository;
pub use model::{Filter, FilterListItem, StoredQuery};
pub use repository::{FilterRepository, InMemoryFilterRepository};
pub use service::FilterService;
