//! errors.rs - Custom error types for the patrol-core library.
//!
//! `PatrolError` covers the few places where the library fails loudly
//! (direct catalog lookups, configuration loading). `CheckError` is what a
//! check implementation returns when it cannot produce a verdict; the runner
//! always converts it into a failing `CheckResult`, so it never reaches the
//! caller of a scan.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error types surfaced by the `patrol-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PatrolError {
    #[error("Unknown check: {0}")]
    UnknownCheck(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),
}

/// Error raised by a single check while it runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("{0}")]
    Execution(String),
}

impl CheckError {
    /// Convenience constructor for the common case.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_check_message() {
        let err = PatrolError::UnknownCheck("nope".to_string());
        assert_eq!(err.to_string(), "Unknown check: nope");
    }

    #[test]
    fn test_config_load_message() {
        let err = PatrolError::ConfigLoad("unknown adapter 'loud'".to_string());
        assert_eq!(err.to_string(), "Failed to load configuration: unknown adapter 'loud'");
    }

    #[test]
    fn test_check_error_display_is_bare_message() {
        assert_eq!(CheckError::execution("boom").to_string(), "boom");
    }
}
