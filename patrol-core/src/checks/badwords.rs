//! Profanity lookup against the active word set.
//!
//! Tokens are runs of letters, digits and `@ . - _ '` (straight or curly
//! apostrophe), so e-mail-ish and hyphenated words are looked up whole.

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

use crate::checks::{dedupe_preserving_order, CheckContext, CheckResult, WordSet};
use crate::security::{compile_pattern, safe_regex_tokens, validate_input_length};

pub const NAME: &str = "badwords";

const SHOWN_IN_MESSAGE: usize = 5;

#[derive(Debug, Default, Deserialize)]
struct WordList {
    #[serde(default)]
    words: Vec<String>,
}

/// The compiled-in list, lowercased.
pub static DEFAULT_WORDS: Lazy<WordSet> = Lazy::new(|| {
    let yaml = include_str!("../../config/default_badwords.yaml");
    let list: WordList = serde_yml::from_str(yaml).unwrap_or_else(|e| {
        warn!("Failed to parse the embedded profanity list: {}", e);
        WordList::default()
    });
    debug!("Loaded {} default profanity entries.", list.words.len());
    Arc::new(normalize_words(list.words))
});

static TOKEN: Lazy<Option<Regex>> = Lazy::new(|| compile_pattern(r"[a-z0-9@.\-_'’]+"));

/// Lowercases and collects a word list, dropping blank entries.
pub fn normalize_words<I, S>(words: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Splits `value` into lowercase lookup tokens.
pub fn tokenize(value: &str) -> Vec<String> {
    let lowered = value.to_lowercase();
    match TOKEN.as_ref() {
        Some(rx) => safe_regex_tokens(rx, &lowered).into_iter().map(str::to_string).collect(),
        None => Vec::new(),
    }
}

/// Flags tokens found in `words`, skipping anything on the context allowlist.
pub fn badwords_check(value: &str, ctx: &CheckContext, words: &HashSet<String>) -> CheckResult {
    if !validate_input_length(value) {
        return CheckResult::length_exceeded(NAME);
    }

    let allow = normalize_words(&ctx.allowlist);
    let hits = dedupe_preserving_order(
        tokenize(value)
            .into_iter()
            .filter(|t| !allow.contains(t) && words.contains(t)),
    );

    if hits.is_empty() {
        return CheckResult::pass(NAME);
    }
    let shown = hits.iter().take(SHOWN_IN_MESSAGE).cloned().collect::<Vec<_>>().join(", ");
    CheckResult::fail(NAME, format!("Contains blocked terms: {}", shown)).with_details(json!({ "hits": hits }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(r: &CheckResult) -> Vec<String> {
        serde_json::from_value(r.details.as_ref().unwrap()["hits"].clone()).unwrap()
    }

    fn words(list: &[&str]) -> HashSet<String> {
        normalize_words(list)
    }

    #[test]
    fn test_default_list_loads() {
        assert!(!DEFAULT_WORDS.is_empty());
        assert!(DEFAULT_WORDS.iter().all(|w| w == &w.to_lowercase()));
    }

    #[test]
    fn test_hits_are_unique_and_case_insensitive() {
        let r = badwords_check("Word1 word2 WORD1", &CheckContext::default(), &words(&["word1"]));
        assert!(!r.ok);
        assert_eq!(hits(&r), vec!["word1"]);
        assert_eq!(r.message.as_deref(), Some("Contains blocked terms: word1"));
    }

    #[test]
    fn test_allowlist_exempts_terms() {
        let ctx = CheckContext {
            allowlist: vec!["Scunthorpe".to_string()],
            ..Default::default()
        };
        let set = words(&["scunthorpe", "bad"]);
        let r = badwords_check("scunthorpe is fine", &ctx, &set);
        assert!(r.ok);
        let r = badwords_check("scunthorpe is bad", &ctx, &set);
        assert_eq!(hits(&r), vec!["bad"]);
    }

    #[test]
    fn test_tokens_keep_email_and_apostrophe_runs() {
        assert_eq!(tokenize("Mail a.b@c.io, don't"), vec!["mail", "a.b@c.io", "don't"]);
    }

    #[test]
    fn test_message_lists_first_five_unique_hits() {
        let set = words(&["a1", "a2", "a3", "a4", "a5", "a6"]);
        let r = badwords_check("a1 a2 a3 a4 a5 a6 a1", &CheckContext::default(), &set);
        assert_eq!(r.message.as_deref(), Some("Contains blocked terms: a1, a2, a3, a4, a5"));
        assert_eq!(hits(&r).len(), 6);
    }

    #[test]
    fn test_empty_string_passes() {
        assert!(badwords_check("", &CheckContext::default(), &DEFAULT_WORDS).ok);
    }
}
