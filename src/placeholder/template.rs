//! # Template Engine
//!
//! Splits canonical template text into literal and directive segments and
//! executes the directives against an [`EvaluationContext`].
//!
//! The directive set is closed:
//!
//! | Directive      | Output                                            |
//! |----------------|---------------------------------------------------|
//! | `today`        | local date of the evaluation instant, `YYYY-MM-DD`|
//! | `daysAgo N`    | local date minus `N` days, `YYYY-MM-DD`           |
//! | `currentUser`  | acting user id as a bare integer                  |
//!
//! Both `name arg` and `name(arg)` invocation forms are accepted. Anything
//! else fails the render; nothing is ever substituted with an empty string.
//! There are no loops, conditionals or nested calls, so execution is a single
//! pass over the segments.

use chrono::{Days, NaiveDate};

use super::context::EvaluationContext;
use super::errors::{RenderError, RenderResult};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A parsed span of template text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text emitted as-is
    Literal(&'a str),

    /// `{{ ... }}` invocation resolved at execution time
    Directive(Directive<'a>),
}

/// A directive invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Directive name
    pub name: &'a str,

    /// Literal arguments, in order
    pub args: Vec<&'a str>,

    /// Byte offset of the opening `{{`
    pub offset: usize,
}

/// The supported directives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Today,
    DaysAgo,
    CurrentUser,
}

impl Builtin {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "today" => Some(Builtin::Today),
            "daysAgo" => Some(Builtin::DaysAgo),
            "currentUser" => Some(Builtin::CurrentUser),
            _ => None,
        }
    }
}

/// Parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Template<'a> {
    /// Parse template text into segments
    pub fn parse(source: &'a str) -> RenderResult<Self> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        while let Some(found) = source[cursor..].find(OPEN) {
            let open = cursor + found;
            if open > cursor {
                segments.push(Segment::Literal(&source[cursor..open]));
            }

            let body_start = open + OPEN.len();
            let close = source[body_start..]
                .find(CLOSE)
                .map(|i| body_start + i)
                .ok_or_else(|| RenderError::parse("unclosed directive", open))?;

            let directive = parse_directive(&source[body_start..close], open)?;
            segments.push(Segment::Directive(directive));
            cursor = close + CLOSE.len();
        }

        if cursor < source.len() {
            segments.push(Segment::Literal(&source[cursor..]));
        }

        Ok(Self { segments })
    }

    /// Parsed segments in source order
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Directive invocations in source order
    pub fn directives(&self) -> impl Iterator<Item = &Directive<'a>> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Directive(d) => Some(d),
            Segment::Literal(_) => None,
        })
    }

    /// Execute every directive and concatenate the output
    pub fn execute(&self, ctx: &EvaluationContext) -> RenderResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Directive(directive) => out.push_str(&evaluate(directive, ctx)?),
            }
        }
        Ok(out)
    }
}

/// Parse and execute template text in one step
pub fn execute(source: &str, ctx: &EvaluationContext) -> RenderResult<String> {
    Template::parse(source)?.execute(ctx)
}

/// Parse the text between `{{` and `}}`
fn parse_directive(body: &str, offset: usize) -> RenderResult<Directive<'_>> {
    let body = body.trim();
    if body.is_empty() {
        return Err(RenderError::parse("empty directive", offset));
    }

    let (name, args) = match body.find('(') {
        Some(paren) => {
            let inner = body[paren + 1..]
                .strip_suffix(')')
                .ok_or_else(|| RenderError::parse("unclosed argument list", offset))?;
            let args = if inner.trim().is_empty() {
                Vec::new()
            } else {
                inner.split(',').map(str::trim).collect()
            };
            (body[..paren].trim_end(), args)
        }
        None => {
            let mut words = body.split_whitespace();
            let name = words.next().unwrap_or_default();
            (name, words.collect())
        }
    };

    if !is_identifier(name) {
        return Err(RenderError::parse(
            format!("invalid directive name '{}'", name),
            offset,
        ));
    }

    Ok(Directive { name, args, offset })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Resolve one directive against the context
fn evaluate(directive: &Directive<'_>, ctx: &EvaluationContext) -> RenderResult<String> {
    let builtin = Builtin::lookup(directive.name).ok_or_else(|| RenderError::UnknownDirective {
        name: directive.name.to_string(),
    })?;

    match builtin {
        Builtin::Today => {
            expect_arity(directive, 0)?;
            Ok(format_date(ctx.local_date()))
        }
        Builtin::DaysAgo => {
            expect_arity(directive, 1)?;
            let days = parse_day_count(directive.name, directive.args[0])?;
            let date = ctx
                .local_date()
                .checked_sub_days(Days::new(days))
                .ok_or_else(|| RenderError::DateOutOfRange {
                    directive: directive.name.to_string(),
                })?;
            Ok(format_date(date))
        }
        Builtin::CurrentUser => {
            expect_arity(directive, 0)?;
            Ok(ctx.acting_user_id.to_string())
        }
    }
}

fn expect_arity(directive: &Directive<'_>, expected: usize) -> RenderResult<()> {
    if directive.args.len() == expected {
        return Ok(());
    }
    Err(RenderError::invalid_arguments(
        directive.name,
        format!("expected {} argument(s), got {}", expected, directive.args.len()),
    ))
}

/// Non-negative decimal day count; signs are rejected
fn parse_day_count(directive: &str, arg: &str) -> RenderResult<u64> {
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RenderError::invalid_arguments(
            directive,
            format!("'{}' is not a non-negative integer", arg),
        ));
    }
    arg.parse::<u64>().map_err(|_| {
        RenderError::invalid_arguments(directive, format!("'{}' is too large", arg))
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx() -> EvaluationContext {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        EvaluationContext::new(instant, chrono_tz::UTC, 42)
    }

    #[test]
    fn test_parse_segments() {
        let template = Template::parse(r#"{"a":"{{ today }}","b":{{ daysAgo 5 }}}"#).unwrap();
        let directives: Vec<_> = template.directives().collect();

        assert_eq!(template.segments().len(), 5);
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].name, "today");
        assert!(directives[0].args.is_empty());
        assert_eq!(directives[1].name, "daysAgo");
        assert_eq!(directives[1].args, vec!["5"]);
        assert_eq!(directives[1].offset, 23);
    }

    #[test]
    fn test_call_form_accepted() {
        let template = Template::parse("{{ daysAgo(5) }}{{currentUser()}}").unwrap();
        let directives: Vec<_> = template.directives().collect();
        assert_eq!(directives[0].args, vec!["5"]);
        assert!(directives[1].args.is_empty());
    }

    #[test]
    fn test_no_directives_is_single_literal() {
        let template = Template::parse(r#"{"status":"error"}"#).unwrap();
        assert_eq!(template.segments(), &[Segment::Literal(r#"{"status":"error"}"#)]);
        assert_eq!(Template::parse("").unwrap().segments().len(), 0);
    }

    #[test]
    fn test_stray_close_is_literal() {
        assert_eq!(execute(r#"{"a":"}}"}"#, &ctx()).unwrap(), r#"{"a":"}}"}"#);
    }

    #[test]
    fn test_today() {
        assert_eq!(execute("{{ today }}", &ctx()).unwrap(), "2024-01-15");
    }

    #[test]
    fn test_days_ago() {
        assert_eq!(execute("{{ daysAgo 5 }}", &ctx()).unwrap(), "2024-01-10");
        assert_eq!(execute("{{ daysAgo(5) }}", &ctx()).unwrap(), "2024-01-10");
        assert_eq!(execute("{{ daysAgo 0 }}", &ctx()).unwrap(), "2024-01-15");
        assert_eq!(execute("{{ daysAgo 15 }}", &ctx()).unwrap(), "2023-12-31");
    }

    #[test]
    fn test_days_ago_uses_local_calendar() {
        // 2024-03-01 01:00 in Tokyo is still 2024-02-29 in UTC
        let instant = Utc.with_ymd_and_hms(2024, 2, 29, 16, 0, 0).unwrap();
        let tokyo = EvaluationContext::new(instant, chrono_tz::Asia::Tokyo, 1);

        assert_eq!(execute("{{ today }}", &tokyo).unwrap(), "2024-03-01");
        assert_eq!(execute("{{ daysAgo 1 }}", &tokyo).unwrap(), "2024-02-29");
    }

    #[test]
    fn test_current_user() {
        assert_eq!(
            execute(r#"{"user_id": {{ currentUser }}}"#, &ctx()).unwrap(),
            r#"{"user_id": 42}"#
        );
    }

    #[test]
    fn test_unknown_directive_fails() {
        for source in ["{{ tomorrow }}", "{{ now 1 }}", "{{ current_user }}", "{{ Today }}"] {
            assert!(
                matches!(
                    execute(source, &ctx()),
                    Err(RenderError::UnknownDirective { .. })
                ),
                "source: {source}"
            );
        }
    }

    #[test]
    fn test_malformed_syntax_fails() {
        for source in [
            "{{ today",
            "{{ }}",
            "{{ .Now }}",
            "{{ today-7w }}",
            "{{ daysAgo(5 }}",
            "{{ 5 }}",
        ] {
            assert!(
                matches!(execute(source, &ctx()), Err(RenderError::Parse { .. })),
                "source: {source}"
            );
        }
    }

    #[test]
    fn test_wrong_arguments_fail() {
        for source in [
            "{{ today 1 }}",
            "{{ daysAgo }}",
            "{{ daysAgo 1 2 }}",
            "{{ daysAgo -5 }}",
            "{{ daysAgo +5 }}",
            "{{ daysAgo five }}",
            "{{ daysAgo 99999999999999999999999 }}",
            "{{ currentUser 7 }}",
        ] {
            assert!(
                matches!(
                    execute(source, &ctx()),
                    Err(RenderError::InvalidArguments { .. })
                ),
                "source: {source}"
            );
        }
    }

    #[test]
    fn test_date_out_of_range_fails() {
        let err = execute("{{ daysAgo 18446744073709551615 }}", &ctx()).unwrap_err();
        assert!(matches!(err, RenderError::DateOutOfRange { .. }));
    }

    #[test]
    fn test_first_failure_wins() {
        let err = execute("{{ nope }}{{ daysAgo x }}", &ctx()).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnknownDirective {
                name: "nope".to_string()
            }
        );
    }
}
