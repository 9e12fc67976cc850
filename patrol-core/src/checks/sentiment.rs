//! Lexicon-based sentiment scoring.
//!
//! Informational only: `sentiment_check` never fails, it just attaches the
//! analysis as details so a UI can show a mood indicator.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;

use crate::checks::CheckResult;
use crate::security::{compile_pattern, safe_regex_tokens, validate_input_length};

pub const NAME: &str = "sentiment";

/// Comparative scores within this distance of zero are neutral.
const NEUTRAL_BAND: f64 = 0.1;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.extend([
        "good", "great", "excellent", "amazing", "wonderful", "fantastic", "awesome", "love", "like",
        "happy", "joy", "pleased", "delighted", "thrilled", "excited", "brilliant", "perfect",
        "beautiful", "nice", "best", "super", "fabulous", "terrific", "outstanding", "impressive",
        "glad", "thank", "thanks", "appreciate", "enjoy", "fun", "exceeded", "exceeds", "quality",
    ]);
    set
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.extend([
        "bad", "terrible", "awful", "horrible", "worst", "hate", "dislike", "angry", "sad",
        "disappointed", "frustrated", "annoyed", "upset", "unhappy", "poor", "sucks", "useless",
        "waste", "fail", "failed", "wrong", "problem", "issue", "concern", "worried", "fear",
        "afraid", "scary", "difficult", "hard", "confusing", "broken", "error",
    ]);
    set
});

static INTENSIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.extend([
        "very", "extremely", "really", "super", "incredibly", "absolutely", "totally", "completely",
    ]);
    set
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.extend([
        "not", "no", "never", "none", "nobody", "nothing", "neither", "nowhere", "hardly", "barely",
    ]);
    set
});

static WORD: Lazy<Option<Regex>> = Lazy::new(|| compile_pattern(r"[a-z']+"));

/// Overall tone of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Negative,
    Neutral,
    Positive,
}

impl Mood {
    fn from_comparative(comparative: f64) -> Self {
        if comparative < -NEUTRAL_BAND {
            Mood::Negative
        } else if comparative > NEUTRAL_BAND {
            Mood::Positive
        } else {
            Mood::Neutral
        }
    }
}

/// Full output of [`analyze_sentiment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: i64,
    /// `score` divided by the token count; zero for empty input.
    pub comparative: f64,
    pub mood: Mood,
    pub tokens: usize,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

/// Scores `text` token by token.
///
/// A negation or intensifier is not scored itself; it modifies the next
/// token that is neither, doubling (intensifier) and/or flipping (negation)
/// that token's contribution.
pub fn analyze_sentiment(text: &str) -> SentimentResult {
    let lowered = text.to_lowercase();
    let tokens = match WORD.as_ref() {
        Some(rx) => safe_regex_tokens(rx, &lowered),
        None => Vec::new(),
    };

    let mut score: i64 = 0;
    let mut positive = Vec::new();
    let mut negative = Vec::new();
    let mut negate_next = false;
    let mut intensify_next = false;

    for &token in &tokens {
        if NEGATIONS.contains(token) {
            negate_next = true;
            continue;
        }
        if INTENSIFIERS.contains(token) {
            intensify_next = true;
            continue;
        }

        let mut token_score = if POSITIVE_WORDS.contains(token) {
            positive.push(token.to_string());
            1
        } else if NEGATIVE_WORDS.contains(token) {
            negative.push(token.to_string());
            -1
        } else {
            0
        };

        if intensify_next {
            token_score *= 2;
            intensify_next = false;
        }
        if negate_next {
            token_score = -token_score;
            negate_next = false;
        }
        score += token_score;
    }

    let comparative = if tokens.is_empty() {
        0.0
    } else {
        score as f64 / tokens.len() as f64
    };

    SentimentResult {
        score,
        comparative,
        mood: Mood::from_comparative(comparative),
        tokens: tokens.len(),
        positive,
        negative,
    }
}

/// Attaches a sentiment analysis to the result; always passes.
pub fn sentiment_check(value: &str) -> CheckResult {
    if !validate_input_length(value) {
        return CheckResult::pass(NAME).with_details(json!({ "reason": "length_exceeded" }));
    }
    let analysis = analyze_sentiment(value);
    CheckResult::pass(NAME).with_details(json!({
        "mood": analysis.mood,
        "score": analysis.score,
        "comparative": analysis.comparative,
        "positive": analysis.positive,
        "negative": analysis.negative,
        "tokens": analysis.tokens,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text() {
        let r = analyze_sentiment("This is great and I love it");
        assert_eq!(r.score, 2);
        assert_eq!(r.mood, Mood::Positive);
        assert_eq!(r.positive, vec!["great", "love"]);
    }

    #[test]
    fn test_oversized_input_still_passes() {
        let r = sentiment_check(&"a".repeat(crate::security::MAX_INPUT_LENGTH + 1));
        assert!(r.ok);
        assert!(r.message.is_none());
        assert_eq!(r.details, Some(json!({ "reason": "length_exceeded" })));
    }

    #[test]
    fn test_negative_text() {
        let r = analyze_sentiment("Terrible, broken, useless.");
        assert_eq!(r.score, -3);
        assert_eq!(r.mood, Mood::Negative);
        assert_eq!(r.negative.len(), 3);
    }

    #[test]
    fn test_negation_flips_next_scored_word() {
        let r = analyze_sentiment("not good");
        assert_eq!(r.score, -1);
        assert_eq!(r.tokens, 2);
    }

    #[test]
    fn test_intensifier_doubles_and_combines_with_negation() {
        assert_eq!(analyze_sentiment("very good").score, 2);
        assert_eq!(analyze_sentiment("not very good").score, -2);
    }

    #[test]
    fn test_modifier_is_consumed_by_unscored_token() {
        // "very" is spent on "the", so "good" scores plainly.
        assert_eq!(analyze_sentiment("very the good").score, 1);
    }

    #[test]
    fn test_neutral_band() {
        let r = analyze_sentiment("good one two three four five six seven eight nine ten");
        assert!(r.comparative > 0.0 && r.comparative <= NEUTRAL_BAND);
        assert_eq!(r.mood, Mood::Neutral);
    }

    #[test]
    fn test_empty_text_is_neutral_with_zero_comparative() {
        let r = analyze_sentiment("");
        assert_eq!(r.tokens, 0);
        assert_eq!(r.comparative, 0.0);
        assert_eq!(r.mood, Mood::Neutral);
    }

    #[test]
    fn test_check_always_passes_with_details() {
        let r = sentiment_check("I hate this awful thing");
        assert!(r.ok);
        assert!(r.message.is_none());
        assert_eq!(r.detail_str("mood"), Some("negative"));
    }
}
