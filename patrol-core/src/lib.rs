// patrol-core/src/lib.rs
//! # Payload Patrol Core Library
//!
//! `patrol-core` inspects untrusted input before an application stores or
//! renders it. Given any JSON-like value (a string, a sequence or a nested
//! mapping) it runs an ordered list of heuristic checks over every string it
//! contains and reports either a pass/fail verdict with path-tagged issues, or
//! a sanitized copy of the input.
//!
//! ## Modules
//!
//! * `payload`: The `Payload` value model that scans operate on.
//! * `security`: Length gating, bounded regex helpers and reserved-key guards.
//! * `checks`: The built-in checks (`sql`, `scripts`, `html`, `badwords`, `limit`, `sentiment`).
//! * `catalog`: The named-check store and the active profanity word set.
//! * `runner`: Ordered execution of a check list over one string.
//! * `session`: The recursive walker, `Session` and one-shot `audit`.
//! * `config`: `PatrolConfig` switches, `AdapterMode` and YAML loading.
//! * `text`: Helpers for previewing, normalising and enumerating strings.
//! * `errors`: Error types for the few operations that can fail.
//!
//! ## Adapter Modes
//!
//! * **block** (default): a string stops at its first failing check.
//! * **warn**: every check runs and every failure is reported.
//! * **strip**: checks that can redact (currently `scripts`) replace the
//!   string and the run continues; the sanitized payload is returned.
//!
//! ## Usage Example
//!
//! ```rust
//! use patrol_core::{Payload, PatrolConfig, Session};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let session = Session::new(PatrolConfig::default());
//! let payload = Payload::from(serde_json::json!({
//!     "name": "Alice",
//!     "comment": "<script>alert(1)</script>",
//! }));
//!
//! let result = session.scan(&payload).await;
//! assert!(!result.ok);
//! assert_eq!(result.issues[0].rule, "scripts");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Scanning never fails: unknown check names and failing custom checks come
//! back as failing `CheckResult`s. Only direct catalog lookups
//! (`CheckCatalog::get`) and configuration loading return errors.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod catalog;
pub mod checks;
pub mod config;
pub mod errors;
pub mod payload;
pub mod runner;
pub mod security;
pub mod session;
pub mod text;

/// Re-exports the check catalog and the process-wide registration helpers.
pub use catalog::{register_check, register_check_fn, register_profanity_list, CheckCatalog};

/// Re-exports the shared check types and the sentiment analyser.
pub use checks::{
    analyze_sentiment, CheckContext, CheckKind, CheckResult, CustomCheck, FnCheck, LimitConfig, Mood,
    SentimentResult,
};

/// Re-exports configuration types.
pub use config::{AdapterMode, PatrolConfig, DEFAULT_MAX_DEPTH};

/// Re-exports the error types.
pub use errors::{CheckError, PatrolError};

/// Re-exports the value model.
pub use payload::{Mapping, PathSegment, Payload, Prototype};

/// Re-exports the single-string runner.
pub use runner::{run_checks, RunChecksResult, RunOptions, MAX_CHECKS};

/// Re-exports the input-hardening helpers most callers reach for.
pub use security::{has_dangerous_keys, is_plain_object, sanitize_keys, MAX_INPUT_LENGTH};

/// Re-exports scanning entry points.
pub use session::{audit, audit_with_catalog, default_audit_checks, AuditOptions, Issue, ScanResult, Session};

/// Re-exports the text helpers.
pub use text::{preview, sanitize_string, walk_strings, SanitizeOptions};
