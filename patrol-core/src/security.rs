//! security.rs - Input hardening shared by every check.
//!
//! Two families of helpers live here:
//!
//! * Length gating and guarded regex application. Every check runs its
//!   patterns through these wrappers, so an oversized input degrades to
//!   "no match" (or a `length_exceeded` failure) before any pattern touches it,
//!   and match iteration is always bounded.
//! * Object-key guards against prototype pollution: the reserved key set, a
//!   plain-object predicate and a recursive key sanitizer.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Captures, Match, Regex, RegexBuilder};

use crate::payload::{Mapping, Payload};

/// Hard ceiling on the number of characters any check will look at.
pub const MAX_INPUT_LENGTH: usize = 1_000_000;

/// Upper bound on the number of matches collected from one input.
pub const MAX_REGEX_ITERATIONS: usize = 1000;

/// Object keys that can reach a shared prototype when merged naively.
pub const DANGEROUS_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Compiled-program size limit applied to every built-in pattern.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Returns `true` when `value` is within [`MAX_INPUT_LENGTH`] characters.
pub fn validate_input_length(value: &str) -> bool {
    validate_input_length_with(value, MAX_INPUT_LENGTH)
}

/// Returns `true` when `value` holds at most `max_length` characters.
pub fn validate_input_length_with(value: &str, max_length: usize) -> bool {
    // Byte length bounds char count from above, so most inputs skip the count.
    value.len() <= max_length || value.chars().count() <= max_length
}

/// Tests `regex` against `value`; over-length input never matches.
pub fn safe_regex_test(regex: &Regex, value: &str) -> bool {
    if !validate_input_length(value) {
        return false;
    }
    regex.is_match(value)
}

/// Returns the leftmost match of `regex` in `value`, if the input is small enough.
pub fn safe_regex_find<'h>(regex: &Regex, value: &'h str) -> Option<Match<'h>> {
    if !validate_input_length(value) {
        return None;
    }
    regex.find(value)
}

/// Collects at most `max_iterations` successive captures of `regex` in `value`.
///
/// The underlying iterator resumes after each match and steps past empty
/// matches, so a zero-width pattern cannot spin on the same offset.
pub fn safe_regex_captures<'h>(
    regex: &Regex,
    value: &'h str,
    max_iterations: usize,
) -> Vec<Captures<'h>> {
    if !validate_input_length(value) {
        return Vec::new();
    }
    let captures: Vec<Captures<'h>> = regex.captures_iter(value).take(max_iterations).collect();
    if captures.len() == max_iterations {
        debug!(
            "Pattern '{}' hit the iteration cap of {} matches.",
            regex.as_str(),
            max_iterations
        );
    }
    captures
}

/// Splits `value` into every non-overlapping match of `regex`.
///
/// Used by the tokenizing checks, which need the full token stream rather
/// than a capped sample; the length gate still applies.
pub fn safe_regex_tokens<'h>(regex: &Regex, value: &'h str) -> Vec<&'h str> {
    if !validate_input_length(value) {
        return Vec::new();
    }
    regex.find_iter(value).map(|m| m.as_str()).collect()
}

/// Compiles a static pattern catalogue.
///
/// A pattern that fails to compile is logged and skipped; the remaining
/// patterns stay usable.
pub fn compile_patterns(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| {
            match RegexBuilder::new(pattern).size_limit(REGEX_SIZE_LIMIT).build() {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!("Skipping pattern '{}': {}", pattern, e);
                    None
                }
            }
        })
        .collect()
}

/// Compiles a single pattern, logging instead of failing.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    compile_patterns(&[pattern]).into_iter().next()
}

/// True for mappings of either prototype flavour; false for sequences,
/// opaque host instances and primitives.
pub fn is_plain_object(value: &Payload) -> bool {
    matches!(value, Payload::Mapping(_))
}

/// Returns the first reserved key the mapping holds as an own key.
pub fn find_dangerous_key(mapping: &Mapping) -> Option<&'static str> {
    DANGEROUS_KEYS.iter().copied().find(|key| mapping.contains_key(key))
}

/// True when the mapping holds any of [`DANGEROUS_KEYS`] as an own key.
pub fn has_dangerous_keys(mapping: &Mapping) -> bool {
    find_dangerous_key(mapping).is_some()
}

/// Rebuilds `value` with every reserved key removed at every depth.
pub fn sanitize_keys(value: &Payload) -> Payload {
    match value {
        Payload::Mapping(mapping) => {
            let mut clean = mapping.empty_like();
            for (key, child) in mapping.iter() {
                if DANGEROUS_KEYS.contains(&key) {
                    debug!("Dropping reserved key '{}' during key sanitization.", key);
                    continue;
                }
                clean.insert(key, sanitize_keys(child));
            }
            Payload::Mapping(clean)
        }
        Payload::Sequence(items) => Payload::Sequence(items.iter().map(sanitize_keys).collect()),
        other => other.clone(),
    }
}
