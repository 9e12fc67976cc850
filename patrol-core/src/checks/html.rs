//! HTML tag allowlisting. Detection only; nothing is removed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use std::collections::HashSet;

use crate::checks::{dedupe_preserving_order, CheckResult};
use crate::security::{compile_pattern, safe_regex_captures, validate_input_length, MAX_REGEX_ITERATIONS};

pub const NAME: &str = "html";

const SHOWN_IN_MESSAGE: usize = 5;

static ALLOWED_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.extend(["b", "i", "u", "strong", "em", "br", "span"]);
    set
});

static TAG: Lazy<Option<Regex>> = Lazy::new(|| compile_pattern(r"(?i)<\s*/?\s*([a-z0-9:-]+)[^>]*>"));

/// Flags any opening or closing tag outside the inline-formatting allowlist.
///
/// At most `MAX_REGEX_ITERATIONS` tags are read. When that limit is reached
/// without a violation the value fails with `reason = "match_limit_exceeded"`.
pub fn html_check(value: &str) -> CheckResult {
    if !validate_input_length(value) {
        return CheckResult::length_exceeded(NAME);
    }
    let Some(tag_rx) = TAG.as_ref() else {
        return CheckResult::pass(NAME);
    };

    let found = safe_regex_captures(tag_rx, value, MAX_REGEX_ITERATIONS);
    let truncated = found.len() >= MAX_REGEX_ITERATIONS;
    let bad = found
        .into_iter()
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_lowercase()))
        .filter(|tag| !ALLOWED_TAGS.contains(tag.as_str()));
    let unique = dedupe_preserving_order(bad);

    if unique.is_empty() {
        if truncated {
            // Tags past the match limit were never inspected.
            return CheckResult::fail(NAME, "Too many HTML tags to validate.").with_details(json!({
                "reason": "match_limit_exceeded",
                "limit": MAX_REGEX_ITERATIONS,
            }));
        }
        return CheckResult::pass(NAME);
    }
    let shown = unique.iter().take(SHOWN_IN_MESSAGE).cloned().collect::<Vec<_>>().join(", ");
    CheckResult::fail(NAME, format!("HTML not allowed: {}", shown)).with_details(json!({ "tags": unique }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(r: &CheckResult) -> Vec<String> {
        serde_json::from_value(r.details.as_ref().unwrap()["tags"].clone()).unwrap()
    }

    #[test]
    fn test_allowed_formatting_passes() {
        let r = html_check("<b>bold</b> and <EM>em</EM><br/><span class='x'>s</span>");
        assert!(r.ok, "{:?}", r);
    }

    #[test]
    fn test_disallowed_tags_are_reported_once() {
        let r = html_check("<p>Hello</p><div><p>again</p></div>");
        assert!(!r.ok);
        assert_eq!(tags(&r), vec!["p", "div"]);
        assert_eq!(r.message.as_deref(), Some("HTML not allowed: p, div"));
    }

    #[test]
    fn test_tag_names_are_case_insensitive() {
        let r = html_check("<IMG SRC=x>");
        assert_eq!(tags(&r), vec!["img"]);
    }

    #[test]
    fn test_message_lists_first_five() {
        let r = html_check("<a><p><div><img><table><form>");
        assert_eq!(r.message.as_deref(), Some("HTML not allowed: a, p, div, img, table"));
        assert_eq!(tags(&r).len(), 6);
    }

    #[test]
    fn test_tag_hidden_past_match_limit_fails() {
        let r = html_check(&format!("{}<iframe src=evil>", "<b>".repeat(MAX_REGEX_ITERATIONS)));
        assert!(!r.ok);
        assert_eq!(r.details.as_ref().unwrap()["reason"], "match_limit_exceeded");
        assert_eq!(r.message.as_deref(), Some("Too many HTML tags to validate."));
    }

    #[test]
    fn test_violation_within_limit_is_still_named() {
        let r = html_check(&format!("<p>{}", "<b>".repeat(MAX_REGEX_ITERATIONS)));
        assert_eq!(tags(&r), vec!["p"]);
    }

    #[test]
    fn test_allowed_tags_below_limit_pass() {
        assert!(html_check(&"<br>".repeat(MAX_REGEX_ITERATIONS - 1)).ok);
    }

    #[test]
    fn test_comparison_operators_are_not_tags() {
        assert!(html_check("if a <= b then b >= a").ok);
    }
}
