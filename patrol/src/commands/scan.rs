// patrol/src/commands/scan.rs
//! `patrol scan`: scans a JSON document (or raw text) and prints the result.

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

use patrol_core::{
    audit_with_catalog, AuditOptions, CheckCatalog, Payload, PatrolConfig, ScanResult, Session,
};

use crate::cli::ScanCommand;
use crate::commands::{read_input, trim_line_end, write_json};

/// Reads, scans and prints. Returns the scan's `ok`.
pub async fn run_scan(cmd: &ScanCommand) -> Result<bool> {
    let input = read_input(cmd.input_file.as_deref())?;
    let result = scan_input(&input, cmd).await?;
    if !result.ok {
        info!("Scan failed with {} issue(s).", result.issues.len());
    }
    write_json(&result, cmd.pretty)?;
    Ok(result.ok)
}

/// Scans `input` according to `cmd`.
///
/// Without `--checks` the (possibly file-loaded) configuration decides the
/// check list; with it, the listed checks run as a one-shot audit using the
/// configuration's context.
pub async fn scan_input(input: &str, cmd: &ScanCommand) -> Result<ScanResult> {
    let catalog = Arc::new(CheckCatalog::with_builtins());
    if let Some(path) = &cmd.profanity_list {
        let words = load_word_list(path)?;
        info!("Using {} profanity term(s) from {}.", words.len(), path.display());
        catalog.register_profanity_list(words);
    }

    let mut config = match &cmd.config {
        Some(path) => PatrolConfig::load_from_file(path)?,
        None => PatrolConfig::default(),
    };
    if let Some(adapter) = cmd.adapter {
        config.adapter = adapter.into();
    }
    if let Some(max_depth) = cmd.max_depth {
        config.max_depth = max_depth;
    }
    config.allowlist.extend(cmd.allow.iter().cloned());

    let payload = if cmd.raw {
        Payload::from(trim_line_end(input))
    } else {
        serde_json::from_str::<Payload>(input)
            .context("Input is not valid JSON (use --raw to scan plain text)")?
    };

    if cmd.checks.is_empty() {
        let session = Session::with_catalog(config, catalog);
        return Ok(session.scan(&payload).await);
    }

    for name in cmd.checks.iter().filter(|name| !catalog.has(name)) {
        warn!("Check '{}' is not registered; it will be reported as a failure.", name);
    }
    let options = AuditOptions {
        adapter: config.adapter,
        checks: cmd.checks.clone(),
        context: config.context(),
        max_depth: config.max_depth,
    };
    Ok(audit_with_catalog(&payload, options, catalog).await)
}

/// Reads a word list: one term per line, blank lines and `#` comments skipped.
pub fn load_word_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read word list {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
