//! # Render Pipeline
//!
//! `document → serialize → normalize → execute → check → deserialize`
//!
//! Stateless and side-effect free. The first failing stage aborts the render.

use std::time::Instant;

use serde_json::Value;

use super::codec;
use super::context::EvaluationContext;
use super::errors::{RenderError, RenderResult};
use super::normalizer::normalize;
use super::template;
use super::validator;

/// Resolve every placeholder in a stored document
pub fn render(document: &Value, ctx: &EvaluationContext) -> RenderResult<Value> {
    let raw = codec::serialize(document)?;
    render_text(&raw, ctx)
}

/// Resolve every placeholder in raw JSON template text
///
/// Entry point for templates that put directives in non-string positions,
/// e.g. `{"user_id": {{ current_user }}}`, which no document can hold.
pub fn render_text(raw: &str, ctx: &EvaluationContext) -> RenderResult<Value> {
    let canonical = normalize(raw);
    let rendered = template::execute(&canonical, ctx)?;
    let checked = validator::check(rendered)?;
    codec::deserialize(&checked)
}

/// [`render`], declining to start once `deadline` has passed
///
/// The deadline is only consulted before the pipeline starts.
pub fn render_before(
    document: &Value,
    ctx: &EvaluationContext,
    deadline: Option<Instant>,
) -> RenderResult<Value> {
    ensure_not_expired(deadline)?;
    render(document, ctx)
}

/// [`render_text`], declining to start once `deadline` has passed
pub fn render_text_before(
    raw: &str,
    ctx: &EvaluationContext,
    deadline: Option<Instant>,
) -> RenderResult<Value> {
    ensure_not_expired(deadline)?;
    render_text(raw, ctx)
}

fn ensure_not_expired(deadline: Option<Instant>) -> RenderResult<()> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => Err(RenderError::DeadlineExceeded),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::time::Duration;

    fn ctx() -> EvaluationContext {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        EvaluationContext::new(instant, chrono_tz::UTC, 42)
    }

    #[test]
    fn test_render_document() {
        let document = json!({
            "range": {"from": "{{ today-5d }}", "to": "{{ today }}"},
            "tags": ["{{today-0d}}", "static"]
        });

        let rendered = render(&document, &ctx()).unwrap();
        assert_eq!(
            rendered,
            json!({
                "range": {"from": "2024-01-10", "to": "2024-01-15"},
                "tags": ["2024-01-15", "static"]
            })
        );
    }

    #[test]
    fn test_render_text_numeric_user() {
        let rendered = render_text(r#"{"user_id": {{ current_user }}}"#, &ctx()).unwrap();
        assert_eq!(rendered, json!({"user_id": 42}));
    }

    #[test]
    fn test_current_user_inside_string_stays_string() {
        let rendered = render(&json!({"owner": "{{ current_user }}"}), &ctx()).unwrap();
        assert_eq!(rendered, json!({"owner": "42"}));
    }

    #[test]
    fn test_unknown_directive_fails_without_substitution() {
        let err = render(&json!({"a": "{{ yesterday }}"}), &ctx()).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnknownDirective {
                name: "yesterday".to_string()
            }
        );
    }

    #[test]
    fn test_substitution_breaking_json_fails() {
        let err = render_text(r#"{"a": {{ today }}}"#, &ctx()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidJson(_)));

        let err = render_text(r#"{"user_id": {{ current_user }}"#, &ctx()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidJson(_)));
    }

    #[test]
    fn test_expired_deadline_declines() {
        let past = Instant::now() - Duration::from_millis(1);
        let err = render_before(&json!({"a": 1}), &ctx(), Some(past)).unwrap_err();
        assert_eq!(err, RenderError::DeadlineExceeded);

        let err = render_text_before("{}", &ctx(), Some(past)).unwrap_err();
        assert_eq!(err, RenderError::DeadlineExceeded);
    }

    #[test]
    fn test_future_or_missing_deadline_renders() {
        let future = Instant::now() + Duration::from_secs(60);
        let document = json!({"a": "{{ today }}"});

        assert_eq!(
            render_before(&document, &ctx(), Some(future)).unwrap(),
            json!({"a": "2024-01-15"})
        );
        assert_eq!(
            render_before(&document, &ctx(), None).unwrap(),
            json!({"a": "2024-01-15"})
        );
    }
}
