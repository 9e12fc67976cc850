//! session.rs - Recursive payload scanning.
//!
//! A `Session` owns a fixed check list (derived once from a `PatrolConfig`)
//! and a shared `CheckCatalog`. `scan` walks a `Payload` depth-first, runs the
//! check list over every string leaf, tags each failure with the path of the
//! offending string and, in strip mode, rebuilds the payload from the
//! sanitized leaves.
//!
//! Before walking, a top-level mapping is checked once for the reserved keys
//! `__proto__`, `constructor` and `prototype`; any of them fails the whole
//! scan without descending. Nested containers are bounded by `max_depth`.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::catalog::CheckCatalog;
use crate::checks::{badwords, html, scripts, sql, CheckContext, CheckResult};
use crate::config::{AdapterMode, PatrolConfig, DEFAULT_MAX_DEPTH};
use crate::payload::{Mapping, PathSegment, Payload};
use crate::runner::{run_checks, RunChecksResult, RunOptions};
use crate::security::find_dangerous_key;

/// Rule tag of the issue raised when nesting exceeds `max_depth`.
pub const DEPTH_RULE: &str = "depth";

/// One failed check at one location in the scanned payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Keys and indices from the root to the offending string; empty for a
    /// root string.
    pub path: Vec<PathSegment>,
    pub rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Issue {
    fn from_result(path: Vec<PathSegment>, result: CheckResult) -> Self {
        Self {
            path,
            rule: result.name,
            message: result.message,
            details: result.details,
        }
    }

    fn prototype_pollution(key: &str) -> Self {
        Self {
            path: Vec::new(),
            rule: scripts::NAME.to_string(),
            message: Some("Prototype pollution attempt detected".to_string()),
            details: Some(json!({ "reason": "prototype_pollution", "key": key })),
        }
    }

    fn depth_exceeded(path: Vec<PathSegment>, max_depth: usize) -> Self {
        Self {
            path,
            rule: DEPTH_RULE.to_string(),
            message: Some("Maximum nesting depth exceeded".to_string()),
            details: Some(json!({ "reason": "depth_exceeded", "maxDepth": max_depth })),
        }
    }

    /// Reads a string field out of `details`, if present.
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.as_ref()?.get(key)?.as_str()
    }
}

/// Outcome of a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub ok: bool,
    pub issues: Vec<Issue>,
    /// The sanitized payload; only present when the scan ran in strip mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Payload>,
}

/// Result of walking one node.
struct Walked {
    ok: bool,
    issues: Vec<Issue>,
    /// Rebuilt node, only tracked in strip mode.
    value: Option<Payload>,
}

impl Walked {
    fn passthrough(value: &Payload, strip: bool) -> Self {
        Self {
            ok: true,
            issues: Vec::new(),
            value: strip.then(|| value.clone()),
        }
    }
}

type WalkFuture<'a> = Pin<Box<dyn Future<Output = Walked> + Send + 'a>>;

/// A configured scanner.
#[derive(Debug, Clone)]
pub struct Session {
    checks: Vec<String>,
    context: CheckContext,
    adapter: AdapterMode,
    max_depth: usize,
    catalog: Arc<CheckCatalog>,
}

impl Session {
    /// A session over the process-wide catalog.
    pub fn new(config: PatrolConfig) -> Self {
        Self::with_catalog(config, CheckCatalog::global())
    }

    /// A session over an explicit catalog.
    pub fn with_catalog(config: PatrolConfig, catalog: Arc<CheckCatalog>) -> Self {
        let checks = config.check_names();
        debug!(
            "Session created with checks [{}], adapter {}, max depth {}.",
            checks.join(", "),
            config.adapter,
            config.max_depth
        );
        Self {
            context: config.context(),
            adapter: config.adapter,
            max_depth: config.max_depth,
            checks,
            catalog,
        }
    }

    /// A session running exactly `checks`, in order, with `context`.
    ///
    /// Unlike a config-derived session this accepts any registered name,
    /// including custom checks and `sentiment`.
    pub fn with_checks(
        checks: Vec<String>,
        context: CheckContext,
        adapter: AdapterMode,
        catalog: Arc<CheckCatalog>,
    ) -> Self {
        Self {
            checks,
            context,
            adapter,
            max_depth: DEFAULT_MAX_DEPTH,
            catalog,
        }
    }

    /// Sets the nesting bound for subsequent scans.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The check list every string leaf goes through.
    pub fn checks(&self) -> &[String] {
        &self.checks
    }

    pub fn adapter(&self) -> AdapterMode {
        self.adapter
    }

    pub fn catalog(&self) -> &Arc<CheckCatalog> {
        &self.catalog
    }

    /// Scans `value` in the session's adapter mode.
    pub async fn scan(&self, value: &Payload) -> ScanResult {
        self.scan_with(value, None).await
    }

    /// Scans `value`, optionally overriding the adapter mode for this call.
    pub async fn scan_with(&self, value: &Payload, adapter: Option<AdapterMode>) -> ScanResult {
        if let Payload::Mapping(mapping) = value {
            if let Some(key) = find_dangerous_key(mapping) {
                warn!("Rejecting payload with reserved top-level key '{}'.", key);
                return ScanResult {
                    ok: false,
                    issues: vec![Issue::prototype_pollution(key)],
                    value: None,
                };
            }
        }

        let mode = adapter.unwrap_or(self.adapter);
        let opts = RunOptions::with_adapter(mode);
        debug!("Scanning {} payload in {} mode.", value.kind(), mode);

        let walked = self.walk(value, Vec::new(), 0, opts).await;
        debug!(
            "Scan finished: ok={}, {} issue(s).",
            walked.ok,
            walked.issues.len()
        );
        ScanResult {
            ok: walked.ok,
            issues: walked.issues,
            value: if mode == AdapterMode::Strip { walked.value } else { None },
        }
    }

    async fn run_string(&self, value: &str, opts: RunOptions) -> RunChecksResult {
        run_checks(value, &self.checks, &self.context, opts, &self.catalog).await
    }

    /// Walks one node. `depth` counts the containers enclosing `value`.
    fn walk<'a>(
        &'a self,
        value: &'a Payload,
        path: Vec<PathSegment>,
        depth: usize,
        opts: RunOptions,
    ) -> WalkFuture<'a> {
        Box::pin(async move {
            let strip = opts.adapter == AdapterMode::Strip;
            match value {
                Payload::String(s) => {
                    let run = self.run_string(s, opts).await;
                    let ok = run.ok;
                    let issues = run
                        .results
                        .into_iter()
                        .filter(|r| !r.ok)
                        .map(|r| Issue::from_result(path.clone(), r))
                        .collect();
                    Walked {
                        ok,
                        issues,
                        value: strip.then(|| Payload::String(run.value)),
                    }
                }
                Payload::Sequence(_) | Payload::Mapping(_) if depth >= self.max_depth => {
                    warn!(
                        "Payload nesting exceeds {} levels; not descending further.",
                        self.max_depth
                    );
                    Walked {
                        ok: false,
                        issues: vec![Issue::depth_exceeded(path, self.max_depth)],
                        value: strip.then(|| value.clone()),
                    }
                }
                Payload::Sequence(items) => {
                    let mut node = ContainerWalk::new(strip);
                    let mut rebuilt = Vec::with_capacity(if strip { items.len() } else { 0 });
                    for (index, item) in items.iter().enumerate() {
                        let child_path = child(&path, PathSegment::Index(index));
                        let walked = self.walk_child(item, child_path, depth, opts).await;
                        if let Some(v) = node.absorb(walked) {
                            rebuilt.push(v);
                        }
                    }
                    node.finish(Payload::Sequence(rebuilt))
                }
                Payload::Mapping(mapping) => {
                    let mut node = ContainerWalk::new(strip);
                    let mut rebuilt: Mapping = mapping.empty_like();
                    for (key, item) in mapping.iter() {
                        let child_path = child(&path, PathSegment::Key(key.to_string()));
                        let walked = self.walk_child(item, child_path, depth, opts).await;
                        if let Some(v) = node.absorb(walked) {
                            rebuilt.insert(key, v);
                        }
                    }
                    node.finish(Payload::Mapping(rebuilt))
                }
                other => Walked::passthrough(other, strip),
            }
        })
    }

    /// Strings and containers are walked; every other child passes through.
    async fn walk_child(
        &self,
        item: &Payload,
        path: Vec<PathSegment>,
        parent_depth: usize,
        opts: RunOptions,
    ) -> Walked {
        match item {
            Payload::String(_) => self.walk(item, path, parent_depth, opts).await,
            Payload::Sequence(_) | Payload::Mapping(_) => {
                self.walk(item, path, parent_depth + 1, opts).await
            }
            other => Walked::passthrough(other, opts.adapter == AdapterMode::Strip),
        }
    }
}

/// Accumulates child outcomes for a sequence or mapping.
struct ContainerWalk {
    ok: bool,
    issues: Vec<Issue>,
    strip: bool,
}

impl ContainerWalk {
    fn new(strip: bool) -> Self {
        Self {
            ok: true,
            issues: Vec::new(),
            strip,
        }
    }

    /// Folds in one child; returns its rebuilt value in strip mode.
    ///
    /// A container fails as soon as any child reports an issue, even in strip
    /// mode where the child string itself counts as sanitized.
    fn absorb(&mut self, walked: Walked) -> Option<Payload> {
        if !walked.ok || !walked.issues.is_empty() {
            self.ok = false;
        }
        self.issues.extend(walked.issues);
        walked.value
    }

    fn finish(self, rebuilt: Payload) -> Walked {
        Walked {
            ok: self.ok,
            issues: self.issues,
            value: self.strip.then_some(rebuilt),
        }
    }
}

fn child(path: &[PathSegment], segment: PathSegment) -> Vec<PathSegment> {
    let mut next = Vec::with_capacity(path.len() + 1);
    next.extend_from_slice(path);
    next.push(segment);
    next
}

/// Options for a one-shot [`audit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditOptions {
    pub adapter: AdapterMode,
    pub checks: Vec<String>,
    pub context: CheckContext,
    #[serde(alias = "maxDepth")]
    pub max_depth: usize,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            adapter: AdapterMode::Block,
            checks: default_audit_checks(),
            context: CheckContext::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The list `audit` runs when none is given: `[badwords, sql, scripts, html]`.
pub fn default_audit_checks() -> Vec<String> {
    [badwords::NAME, sql::NAME, scripts::NAME, html::NAME]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Scans `value` once with an explicit check list, against the process-wide catalog.
pub async fn audit(value: &Payload, options: AuditOptions) -> ScanResult {
    audit_with_catalog(value, options, CheckCatalog::global()).await
}

/// Scans `value` once with an explicit check list and catalog.
pub async fn audit_with_catalog(
    value: &Payload,
    options: AuditOptions,
    catalog: Arc<CheckCatalog>,
) -> ScanResult {
    let adapter = options.adapter;
    Session::with_checks(options.checks, options.context, adapter, catalog)
        .max_depth(options.max_depth)
        .scan_with(value, Some(adapter))
        .await
}
