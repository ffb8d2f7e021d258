//! # Document Codec
//!
//! Converts the schema-less query document to JSON text before templating
//! and back afterwards. The document model is `serde_json::Value`: a closed
//! set of Null, Bool, Number, String, Array and Object variants nested to any
//! depth. Object key order carries no meaning.

use serde_json::Value;

use super::errors::{RenderError, RenderResult};

/// Write a document as compact JSON text
pub fn serialize(document: &Value) -> RenderResult<String> {
    serde_json::to_string(document).map_err(|e| RenderError::Encode(e.to_string()))
}

/// Read JSON text back into a document
pub fn deserialize(text: &str) -> RenderResult<Value> {
    serde_json::from_str(text).map_err(|e| RenderError::Decode(e.to_string()))
}
