//! Heuristic SQL-injection detection.
//!
//! The catalogue favours recall over precision: free text that merely talks
//! about SQL ("select a seat from the list") will trip it. Callers that accept
//! such text should leave `block_sqli` off for those fields.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::checks::CheckResult;
use crate::security::{compile_patterns, safe_regex_test, validate_input_length};

pub const NAME: &str = "sql";

/// Only this many matching pattern sources are reported.
const MAX_REPORTED_RULES: usize = 5;

static SQL_PATTERNS: &[&str] = &[
    r"(?i)\bunion\b\s+\bselect\b",
    r"(?i)\bselect\b.+\bfrom\b",
    r"(?m)(--|#).+$",
    r"/\*[\s\S]*?\*/",
    r"(?i)\bor\s+1\s*=\s*1\b",
    r"(?i)\bdrop\s+(table|database)\b",
    r"(?i)\binsert\s+into\b",
    r"(?i)\bupdate\b.+\bset\b",
    r"(?i)\bdelete\s+from\b",
    r"(?i)\bsleep\s*\(",
    r"(?i)\bxp_cmdshell\b",
    r";{2,}",
];

static COMPILED: Lazy<Vec<Regex>> = Lazy::new(|| compile_patterns(SQL_PATTERNS));

/// Flags strings that look like SQL statements or injection fragments.
pub fn sql_check(value: &str) -> CheckResult {
    if !validate_input_length(value) {
        return CheckResult::length_exceeded(NAME);
    }

    let hits: Vec<&str> = COMPILED
        .iter()
        .filter(|rx| safe_regex_test(rx, value))
        .take(MAX_REPORTED_RULES)
        .map(|rx| rx.as_str())
        .collect();

    if hits.is_empty() {
        return CheckResult::pass(NAME);
    }
    CheckResult::fail(NAME, "Looks like SQL or injection patterns.").with_details(json!({ "rules": hits }))
}
