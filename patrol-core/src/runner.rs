//! runner.rs - Ordered execution of named checks over a single string.
//!
//! `run_checks` resolves each name through a `CheckCatalog`, awaits the checks
//! one at a time against the *current* value (which a strip may have
//! replaced), and applies the adapter mode to every failure. Nothing in here
//! returns an error: unknown names and failing custom checks both come back as
//! failing `CheckResult`s.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::CheckCatalog;
use crate::checks::{CheckContext, CheckResult};
use crate::config::AdapterMode;

/// Upper bound on the number of checks a single run will execute.
pub const MAX_CHECKS: usize = 100;

/// Per-run knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    pub adapter: AdapterMode,
    /// Block mode only returns early while this is set.
    pub stop_on_first_block: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            adapter: AdapterMode::Block,
            stop_on_first_block: true,
        }
    }
}

impl RunOptions {
    pub fn with_adapter(adapter: AdapterMode) -> Self {
        Self {
            adapter,
            ..Self::default()
        }
    }
}

/// Aggregate outcome of one `run_checks` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunChecksResult {
    pub ok: bool,
    /// One entry per executed check, in execution order.
    pub results: Vec<CheckResult>,
    /// The string after every adopted strip; the input when nothing was stripped.
    pub value: String,
}

impl RunChecksResult {
    /// The results that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.ok)
    }
}

/// Runs `checks` in order against `value`.
///
/// * The list is capped at [`MAX_CHECKS`].
/// * `strip`: a failing result that carries a `value` replaces the current
///   string and the run continues. The run reports `ok = true` once the list
///   is exhausted.
/// * `block`: the first failure ends the run (when `stop_on_first_block`).
/// * `warn`: every check runs; `ok` is false if any failed.
pub async fn run_checks(
    value: &str,
    checks: &[String],
    ctx: &CheckContext,
    opts: RunOptions,
    catalog: &CheckCatalog,
) -> RunChecksResult {
    if checks.len() > MAX_CHECKS {
        debug!(
            "Check list of {} entries truncated to the first {}.",
            checks.len(),
            MAX_CHECKS
        );
    }

    let words = catalog.word_set();
    let mut current = value.to_string();
    let mut results = Vec::new();

    for name in checks.iter().take(MAX_CHECKS) {
        debug!("Running check '{}' ({:?} mode).", name, opts.adapter);

        let result = match catalog.get(name) {
            Ok(kind) => match kind.run(&current, ctx, &words).await {
                Ok(result) => result,
                Err(e) => CheckResult::fail(name.as_str(), e.to_string())
                    .with_details(json!({ "error": "execution_failed" })),
            },
            Err(e) => {
                CheckResult::fail(name.as_str(), e.to_string()).with_details(json!({ "error": "unknown_check" }))
            }
        };

        if result.ok {
            results.push(result);
            continue;
        }

        debug!(
            "Check '{}' failed: {}",
            name,
            result.message.as_deref().unwrap_or("no message")
        );
        let replacement = result.value.clone();
        results.push(result);

        match opts.adapter {
            AdapterMode::Strip => {
                if let Some(stripped) = replacement {
                    current = stripped;
                }
            }
            AdapterMode::Block if opts.stop_on_first_block => {
                debug!("Block mode: stopping after '{}'.", name);
                return RunChecksResult {
                    ok: false,
                    results,
                    value: current,
                };
            }
            _ => {}
        }
    }

    let ok = match opts.adapter {
        AdapterMode::Strip => true,
        _ => results.iter().all(|r| r.ok),
    };
    RunChecksResult {
        ok,
        results,
        value: current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CheckError;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn failing(name: &'static str) -> impl Fn(&str, &CheckContext) -> Result<CheckResult, CheckError> {
        move |_v: &str, _c: &CheckContext| Ok(CheckResult::fail(name, format!("{} failed", name)))
    }

    #[tokio::test]
    async fn test_block_short_circuits_and_warn_collects() {
        let catalog = CheckCatalog::empty();
        catalog.register_fn("a", failing("a"));
        catalog.register_fn("b", failing("b"));
        let ctx = CheckContext::default();

        let blocked = run_checks("x", &names(&["a", "b"]), &ctx, RunOptions::default(), &catalog).await;
        assert!(!blocked.ok);
        assert_eq!(blocked.results.len(), 1);
        assert_eq!(blocked.results[0].name, "a");

        let warned = run_checks("x", &names(&["a", "b"]), &ctx, RunOptions::with_adapter(AdapterMode::Warn), &catalog).await;
        assert!(!warned.ok);
        assert_eq!(warned.results.len(), 2);
    }

    #[tokio::test]
    async fn test_block_without_short_circuit_runs_everything() {
        let catalog = CheckCatalog::empty();
        catalog.register_fn("a", failing("a"));
        catalog.register_fn("b", failing("b"));
        let opts = RunOptions {
            adapter: AdapterMode::Block,
            stop_on_first_block: false,
        };
        let r = run_checks("x", &names(&["a", "b"]), &CheckContext::default(), opts, &catalog).await;
        assert!(!r.ok);
        assert_eq!(r.results.len(), 2);
    }

    #[tokio::test]
    async fn test_strip_adopts_value_and_reports_ok() {
        let catalog = CheckCatalog::with_builtins();
        let r = run_checks(
            "<script>bad</script>Hello",
            &names(&["scripts", "sql"]),
            &CheckContext::default(),
            RunOptions::with_adapter(AdapterMode::Strip),
            &catalog,
        )
        .await;
        assert!(r.ok);
        assert_eq!(r.value, "Hello");
        assert_eq!(r.failures().count(), 1);
        assert_eq!(r.results.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_check_degrades_to_failing_result() {
        let catalog = CheckCatalog::with_builtins();
        let r = run_checks("hi", &names(&["ghost", "sql"]), &CheckContext::default(), RunOptions::default(), &catalog).await;
        assert!(!r.ok);
        assert_eq!(r.results.len(), 1);
        assert_eq!(r.results[0].message.as_deref(), Some("Unknown check: ghost"));
        assert_eq!(r.results[0].detail_str("error"), Some("unknown_check"));
    }

    #[tokio::test]
    async fn test_execution_error_is_captured() {
        let catalog = CheckCatalog::empty();
        catalog.register_fn("boom", |_v: &str, _c: &CheckContext| Err(CheckError::execution("kaboom")));
        let r = run_checks("hi", &names(&["boom"]), &CheckContext::default(), RunOptions::with_adapter(AdapterMode::Warn), &catalog).await;
        assert!(!r.ok);
        assert_eq!(r.results[0].name, "boom");
        assert_eq!(r.results[0].message.as_deref(), Some("kaboom"));
        assert_eq!(r.results[0].detail_str("error"), Some("execution_failed"));
    }

    #[tokio::test]
    async fn test_check_list_is_capped() {
        let catalog = CheckCatalog::with_builtins();
        let many = vec!["sentiment".to_string(); MAX_CHECKS + 20];
        let r = run_checks("fine", &many, &CheckContext::default(), RunOptions::default(), &catalog).await;
        assert!(r.ok);
        assert_eq!(r.results.len(), MAX_CHECKS);
    }

    #[tokio::test]
    async fn test_clean_input_passes_unchanged() {
        let catalog = CheckCatalog::with_builtins();
        let r = run_checks(
            "Hello there",
            &names(&["sql", "scripts", "html"]),
            &CheckContext::default(),
            RunOptions::default(),
            &catalog,
        )
        .await;
        assert!(r.ok);
        assert_eq!(r.value, "Hello there");
        assert_eq!(r.results.len(), 3);
    }
}
