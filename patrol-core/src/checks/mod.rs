//! Built-in checks and the types every check shares.
//!
//! A check maps one string (plus a `CheckContext`) to a `CheckResult`. The six
//! built-in checks are plain synchronous functions in the submodules below;
//! `CheckKind` is the closed set of things a catalog can hold, with a `Custom`
//! variant for caller-supplied checks behind the async `CustomCheck` trait.
//!
//! To add a built-in check, create a new file (e.g. `emoji.rs`), declare it
//! here and give it a `CheckKind` variant.
//!
//! License: MIT OR APACHE 2.0

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::errors::CheckError;

pub mod badwords;
pub mod html;
pub mod limit;
pub mod scripts;
pub mod sentiment;
pub mod sql;

pub use badwords::badwords_check;
pub use html::html_check;
pub use limit::limit_check;
pub use scripts::scripts_check;
pub use sentiment::{analyze_sentiment, sentiment_check, Mood, SentimentResult};
pub use sql::sql_check;

/// The active profanity word set, shared without copying.
pub type WordSet = Arc<HashSet<String>>;

/// Message reported by every check when the length gate rejects its input.
pub const LENGTH_EXCEEDED_MESSAGE: &str = "Input too long for validation";

/// Character and word thresholds for the `limit` check. Zero or absent means
/// unlimited for that dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    #[serde(alias = "maxChars")]
    pub max_chars: Option<usize>,
    #[serde(alias = "maxWords")]
    pub max_words: Option<usize>,
}

impl LimitConfig {
    pub fn chars(max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
            max_words: None,
        }
    }

    pub fn words(max_words: usize) -> Self {
        Self {
            max_chars: None,
            max_words: Some(max_words),
        }
    }
}

/// Per-call inputs shared by every check in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckContext {
    pub limit: Option<LimitConfig>,
    /// Terms exempt from the `badwords` check, matched case-insensitively.
    pub allowlist: Vec<String>,
    pub locale: Option<String>,
}

/// The outcome of one check against one string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Sanitized replacement for the input; only set by checks that can redact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: true,
            message: None,
            details: None,
            value: None,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: false,
            message: Some(message.into()),
            details: None,
            value: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Reads a string field out of `details`, if present.
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.as_ref()?.get(key)?.as_str()
    }

    /// The result every check returns when its input fails the length gate.
    pub fn length_exceeded(name: impl Into<String>) -> Self {
        Self::fail(name, LENGTH_EXCEEDED_MESSAGE).with_details(json!({ "reason": "length_exceeded" }))
    }
}

/// A caller-supplied check.
///
/// Implement this directly for checks that need to await something; plain
/// closures can be registered through [`FnCheck`].
#[async_trait]
pub trait CustomCheck: Send + Sync {
    async fn run(&self, value: &str, ctx: &CheckContext) -> Result<CheckResult, CheckError>;
}

/// Adapts a synchronous closure into a [`CustomCheck`].
pub struct FnCheck<F>(pub F);

#[async_trait]
impl<F> CustomCheck for FnCheck<F>
where
    F: Fn(&str, &CheckContext) -> Result<CheckResult, CheckError> + Send + Sync,
{
    async fn run(&self, value: &str, ctx: &CheckContext) -> Result<CheckResult, CheckError> {
        (self.0)(value, ctx)
    }
}

/// Everything a catalog entry can be.
#[derive(Clone)]
pub enum CheckKind {
    Badwords,
    Sql,
    Scripts,
    Html,
    Limit,
    Sentiment,
    Custom(Arc<dyn CustomCheck>),
}

impl CheckKind {
    /// The built-in checks under their canonical names, in registration order.
    pub fn builtins() -> [(&'static str, CheckKind); 6] {
        [
            (badwords::NAME, CheckKind::Badwords),
            (sql::NAME, CheckKind::Sql),
            (scripts::NAME, CheckKind::Scripts),
            (html::NAME, CheckKind::Html),
            (limit::NAME, CheckKind::Limit),
            (sentiment::NAME, CheckKind::Sentiment),
        ]
    }

    /// Looks up a built-in check by its canonical name.
    pub fn builtin(name: &str) -> Option<CheckKind> {
        Self::builtins()
            .into_iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, kind)| kind)
    }

    pub fn custom<C: CustomCheck + 'static>(check: C) -> Self {
        CheckKind::Custom(Arc::new(check))
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, CheckKind::Custom(_))
    }

    /// Runs the check against `value`.
    ///
    /// `words` is only consulted by the `badwords` check.
    pub async fn run(
        &self,
        value: &str,
        ctx: &CheckContext,
        words: &HashSet<String>,
    ) -> Result<CheckResult, CheckError> {
        match self {
            CheckKind::Badwords => Ok(badwords_check(value, ctx, words)),
            CheckKind::Sql => Ok(sql_check(value)),
            CheckKind::Scripts => Ok(scripts_check(value)),
            CheckKind::Html => Ok(html_check(value)),
            CheckKind::Limit => Ok(limit_check(value, ctx)),
            CheckKind::Sentiment => Ok(sentiment_check(value)),
            CheckKind::Custom(check) => check.run(value, ctx).await,
        }
    }
}

impl fmt::Debug for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Badwords => write!(f, "Badwords"),
            CheckKind::Sql => write!(f, "Sql"),
            CheckKind::Scripts => write!(f, "Scripts"),
            CheckKind::Html => write!(f, "Html"),
            CheckKind::Limit => write!(f, "Limit"),
            CheckKind::Sentiment => write!(f, "Sentiment"),
            CheckKind::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Keeps the first occurrence of each item, preserving order.
pub(crate) fn dedupe_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}
