//! Inline script and event-handler detection, with targeted stripping.
//!
//! Detection and stripping use separate catalogues. Detection is broad
//! (`document.`, `window.`, `eval(` all count), while stripping only removes
//! constructs that can be cut out without guessing at boundaries: whole
//! `<script>` blocks, quoted `on*=` attributes and `javascript:` URL bodies.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::checks::CheckResult;
use crate::security::{compile_patterns, safe_regex_test, validate_input_length};

pub const NAME: &str = "scripts";

static DETECT_PATTERNS: &[&str] = &[
    r"(?i)<\s*script\b",
    r"(?i)\bon[a-z]+\s*=",
    r"(?i)\bjavascript\s*:",
    r"(?i)\bdocument\.",
    r"(?i)\bwindow\.",
    r"(?i)\beval\s*\(",
];

static STRIP_PATTERNS: &[&str] = &[
    r"(?i)<\s*script\b[^>]*>[\s\S]*?<\s*/\s*script\s*>",
    r#"(?i)\bon[a-z]+\s*=\s*["'][^"']*["']"#,
    r"(?i)\bjavascript\s*:[^)\s]+",
];

static DETECT: Lazy<Vec<Regex>> = Lazy::new(|| compile_patterns(DETECT_PATTERNS));
static STRIP: Lazy<Vec<Regex>> = Lazy::new(|| compile_patterns(STRIP_PATTERNS));

/// Removes every strippable script construct from `value`.
pub fn strip_scripts(value: &str) -> String {
    STRIP.iter().fold(value.to_string(), |current, rx| {
        rx.replace_all(&current, "").into_owned()
    })
}

/// Flags inline scripts and event handlers.
///
/// The result always carries `value`: the input with strippable constructs
/// removed when something was detected, or the input unchanged otherwise.
pub fn scripts_check(value: &str) -> CheckResult {
    if !validate_input_length(value) {
        return CheckResult::length_exceeded(NAME);
    }

    let hits: Vec<&str> = DETECT
        .iter()
        .filter(|rx| safe_regex_test(rx, value))
        .map(|rx| rx.as_str())
        .collect();

    if hits.is_empty() {
        return CheckResult::pass(NAME).with_value(value);
    }

    let stripped = strip_scripts(value);
    debug!(
        "scripts: {} pattern(s) matched, stripped {} byte(s).",
        hits.len(),
        value.len().saturating_sub(stripped.len())
    );

    CheckResult::fail(NAME, "Inline script/event handler detected.")
        .with_details(json!({ "rules": hits }))
        .with_value(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(DETECT.len(), DETECT_PATTERNS.len());
        assert_eq!(STRIP.len(), STRIP_PATTERNS.len());
    }

    #[test]
    fn test_detects_script_tag_and_strips_block() {
        let r = scripts_check("<script>alert(1)</script>Hello");
        assert!(!r.ok);
        assert_eq!(r.message.as_deref(), Some("Inline script/event handler detected."));
        assert_eq!(r.value.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_strips_multiple_blocks_and_keeps_surroundings() {
        let r = scripts_check("Hello<script>bad1</script><SCRIPT type='x'>bad2</SCRIPT >World");
        assert_eq!(r.value.as_deref(), Some("HelloWorld"));
    }

    #[test]
    fn test_strips_event_handler_attribute() {
        let r = scripts_check(r#"<img src="x.png" onerror="alert(1)">"#);
        assert!(!r.ok);
        assert_eq!(r.value.as_deref(), Some(r#"<img src="x.png" >"#));
    }

    #[test]
    fn test_strips_javascript_url() {
        let r = scripts_check(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!r.ok);
        let stripped = r.value.unwrap();
        assert!(!stripped.to_lowercase().contains("javascript:"));
    }

    #[test]
    fn test_detect_only_patterns_leave_value_intact() {
        let r = scripts_check("window.location = '/x'");
        assert!(!r.ok);
        assert_eq!(r.value.as_deref(), Some("window.location = '/x'"));
    }

    #[test]
    fn test_clean_text_passes_with_unchanged_value() {
        let r = scripts_check("Just a friendly note.");
        assert!(r.ok);
        assert!(r.details.is_none());
        assert_eq!(r.value.as_deref(), Some("Just a friendly note."));
    }
}
