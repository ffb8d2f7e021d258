//! # Placeholder Rendering
//!
//! Turns a stored, possibly templated query document into a concrete one.
//!
//! Stored queries may carry placeholders resolved only at apply time:
//!
//! - `{{ today }}`, `{{ daysAgo N }}` and the shorthand `{{ today-Nd }}`
//! - `{{ currentUser }}` and the shorthand `{{ current_user }}`
//!
//! ```ignore
//! use search_filter::placeholder::{render, EvaluationContext};
//!
//! let ctx = EvaluationContext::now(chrono_tz::UTC, 42);
//! let query = render(&serde_json::json!({"since": "{{ today-7d }}"}), &ctx)?;
//! ```

pub mod codec;
mod context;
mod errors;
pub mod normalizer;
mod renderer;
pub mod template;
pub mod validator;

pub use context::EvaluationContext;
pub use errors::{RenderError, RenderResult};
pub use normalizer::normalize;
pub use renderer::{render, render_before, render_text, render_text_before};
pub use template::{Directive, Segment, Template};
