//! config.rs - Session configuration and adapter modes.
//!
//! A `PatrolConfig` is a set of boolean switches that is translated, once, into
//! the ordered list of check names a `Session` runs on every string. Configs
//! can be built in code or loaded from YAML; both snake_case and the camelCase
//! spellings used by JavaScript callers (`blockSQLi`, `allowHTML`, ...) are
//! accepted.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::checks::{badwords, html, limit, scripts, sql, CheckContext, LimitConfig};
use crate::errors::PatrolError;

/// Nesting depth the walker descends before reporting `depth_exceeded`.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What the runner does with a failing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterMode {
    /// Stop at the first failure and report it.
    #[default]
    Block,
    /// Run everything, collect every failure, still report failure.
    Warn,
    /// Replace the string with a check's sanitized value and keep going.
    Strip,
}

impl AdapterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterMode::Block => "block",
            AdapterMode::Warn => "warn",
            AdapterMode::Strip => "strip",
        }
    }
}

impl fmt::Display for AdapterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdapterMode {
    type Err = PatrolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(AdapterMode::Block),
            "warn" => Ok(AdapterMode::Warn),
            "strip" => Ok(AdapterMode::Strip),
            other => Err(PatrolError::ConfigLoad(format!(
                "unknown adapter mode '{}' (expected block, warn or strip)",
                other
            ))),
        }
    }
}

/// Switches that decide which checks a `Session` runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    #[serde(alias = "blockSQLi")]
    pub block_sqli: bool,
    #[serde(alias = "blockXSS")]
    pub block_xss: bool,
    /// When false (the default) the `html` check runs.
    #[serde(alias = "allowHTML")]
    pub allow_html: bool,
    #[serde(alias = "checkProfanity")]
    pub check_profanity: bool,
    /// Presence alone enables the `limit` check.
    pub limit: Option<LimitConfig>,
    pub allowlist: Vec<String>,
    pub adapter: AdapterMode,
    #[serde(alias = "maxDepth")]
    pub max_depth: usize,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            block_sqli: true,
            block_xss: true,
            allow_html: false,
            check_profanity: false,
            limit: None,
            allowlist: Vec::new(),
            adapter: AdapterMode::Block,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl PatrolConfig {
    /// Loads a configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading patrol configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!(
            "Loaded configuration with checks [{}] in {} mode.",
            config.check_names().join(", "),
            config.adapter
        );
        Ok(config)
    }

    /// Parses a configuration from YAML text. Missing fields take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: PatrolConfig = serde_yml::from_str(text).context("Invalid patrol configuration")?;
        debug!("Parsed configuration: {:?}", config);
        Ok(config)
    }

    /// The ordered check list: `[badwords?, sql?, scripts?, html?, limit?]`.
    pub fn check_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.check_profanity {
            names.push(badwords::NAME);
        }
        if self.block_sqli {
            names.push(sql::NAME);
        }
        if self.block_xss {
            names.push(scripts::NAME);
        }
        if !self.allow_html {
            names.push(html::NAME);
        }
        if self.limit.is_some() {
            names.push(limit::NAME);
        }
        names.into_iter().map(str::to_string).collect()
    }

    /// The context every check in a session receives.
    pub fn context(&self) -> CheckContext {
        CheckContext {
            limit: self.limit,
            allowlist: self.allowlist.clone(),
            locale: None,
        }
    }
}
