//! # Rendered Output Validator
//!
//! Confirms rendered text is syntactically valid JSON before it is decoded.
//!
//! The text is not compacted: whatever whitespace the stored template carried
//! is handed on unchanged. Documents written by the codec are already compact,
//! and substitutions never add whitespace.

use serde::de::IgnoredAny;

use super::errors::{RenderError, RenderResult};

/// Check that rendered text is valid JSON, returning it unchanged
pub fn check(rendered: String) -> RenderResult<String> {
    serde_json::from_str::<IgnoredAny>(&rendered)
        .map_err(|e| RenderError::InvalidJson(e.to_string()))?;
    Ok(rendered)
}
