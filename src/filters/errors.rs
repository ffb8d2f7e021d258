//! # Filter Errors
//!
//! Repository errors stay inside the persistence layer; the service
//! translates them into [`FilterError`] so storage details never leak to
//! callers.

use thiserror::Error;

use crate::placeholder::RenderError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type for filter service operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Persistence errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("filter not found")]
    NotFound,

    #[error("filter conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Domain errors surfaced by the filter service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Caller- or data-caused; never transient
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    /// Render budget ran out before work started; retrying may succeed
    #[error("render deadline exceeded")]
    DeadlineExceeded,

    /// Unexpected collaborator failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl FilterError {
    pub fn validation(message: impl Into<String>) -> Self {
        FilterError::Validation(message.into())
    }
}

impl From<RepositoryError> for FilterError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => FilterError::NotFound,
            RepositoryError::Conflict(msg) => FilterError::Conflict(msg),
            RepositoryError::Storage(msg) => FilterError::Internal(msg),
        }
    }
}

impl From<RenderError> for FilterError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::DeadlineExceeded => FilterError::DeadlineExceeded,
            other => FilterError::Validation(format!("render template: {}", other)),
        }
    }
}
