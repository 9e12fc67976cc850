//! Character and word limits.

use serde_json::json;

use crate::checks::{CheckContext, CheckResult};
use crate::security::validate_input_length;

pub const NAME: &str = "limit";

/// Fails when `value` exceeds the context's character or word threshold.
///
/// Characters are Unicode scalar values; words are whitespace-separated runs
/// of the trimmed value. When both thresholds are exceeded, the message
/// names the character limit.
pub fn limit_check(value: &str, ctx: &CheckContext) -> CheckResult {
    if !validate_input_length(value) {
        return CheckResult::length_exceeded(NAME);
    }

    let limit = ctx.limit.unwrap_or_default();
    let max_chars = limit.max_chars.unwrap_or(0);
    let max_words = limit.max_words.unwrap_or(0);

    let length = value.chars().count();
    let words = value.split_whitespace().count();

    let char_fail = max_chars > 0 && length > max_chars;
    let word_fail = max_words > 0 && words > max_words;

    let details = json!({
        "length": length,
        "words": words,
        "maxChars": max_chars,
        "maxWords": max_words,
    });

    let result = if char_fail {
        CheckResult::fail(NAME, format!("Too long ({}/{} chars).", length, max_chars))
    } else if word_fail {
        CheckResult::fail(NAME, format!("Too many words ({}/{}).", words, max_words))
    } else {
        CheckResult::pass(NAME)
    };
    result.with_details(details)
}
