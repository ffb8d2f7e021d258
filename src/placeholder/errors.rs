//! # Render Errors
//!
//! Every failure of the rendering pipeline. All of them stem from the stored
//! template or the supplied context, never from transient state, so none are
//! retried.

use thiserror::Error;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Rendering pipeline errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Template text could not be split into literals and directives
    #[error("template parse: {message} (at byte {offset})")]
    Parse { message: String, offset: usize },

    /// Directive name outside the supported set
    #[error("template execute: unknown directive '{name}'")]
    UnknownDirective { name: String },

    /// Known directive invoked with the wrong arguments
    #[error("template execute: invalid arguments for '{directive}': {message}")]
    InvalidArguments { directive: String, message: String },

    /// Date arithmetic left the representable calendar
    #[error("template execute: date out of range for '{directive}'")]
    DateOutOfRange { directive: String },

    /// Rendered text is not syntactically valid JSON
    #[error("template produced invalid JSON: {0}")]
    InvalidJson(String),

    /// Stored document could not be written as JSON text
    #[error("encode query to JSON: {0}")]
    Encode(String),

    /// Rendered JSON text could not be read back as a document
    #[error("decode JSON to query: {0}")]
    Decode(String),

    /// The caller's deadline passed before rendering started
    #[error("render deadline exceeded before start")]
    DeadlineExceeded,
}

impl RenderError {
    pub(crate) fn parse(message: impl Into<String>, offset: usize) -> Self {
        RenderError::Parse {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn invalid_arguments(directive: &str, message: impl Into<String>) -> Self {
        RenderError::InvalidArguments {
            directive: directive.to_string(),
            message: message.into(),
        }
    }
}
