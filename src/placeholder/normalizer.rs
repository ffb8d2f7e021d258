//! # Shorthand Normalizer
//!
//! Rewrites the two convenience spellings users put in stored queries into
//! canonical directive calls:
//!
//! - `{{ today-7d }}` becomes `{{ daysAgo 7 }}`
//! - `{{ current_user }}` becomes `{{ currentUser }}`
//!
//! Every other byte passes through untouched. Normalization never fails.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// `{{ today-Nd }}` with horizontal whitespace around the braces and the dash.
/// `N` is ASCII digits only.
static TODAY_MINUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{[ \t]*today[ \t]*-[ \t]*([0-9]+)d[ \t]*\}\}").expect("valid today-Nd pattern")
});

/// `{{ current_user }}`
static CURRENT_USER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{[ \t]*current_user[ \t]*\}\}").expect("valid current_user pattern")
});

/// Rewrite shorthand placeholders into canonical directive calls.
///
/// Borrows the input when nothing matched.
pub fn normalize(input: &str) -> Cow<'_, str> {
    match TODAY_MINUS_RE.replace_all(input, "{{ daysAgo $1 }}") {
        Cow::Borrowed(_) => CURRENT_USER_RE.replace_all(input, "{{ currentUser }}"),
        Cow::Owned(rewritten) => {
            Cow::Owned(CURRENT_USER_RE.replace_all(&rewritten, "{{ currentUser }}").into_owned())
        }
    }
}
