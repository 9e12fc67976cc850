// patrol/src/logger.rs
//! Logger setup for the patrol binary.
//!
//! Logs always go to stderr so that stdout carries nothing but command output.
//! Without an explicit level the `RUST_LOG` environment variable decides,
//! falling back to `warn`.
//! License: MIT OR APACHE 2.0

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes `env_logger`. An explicit `level` overrides `RUST_LOG`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.target(Target::Stderr).format_timestamp(None);
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized; keeping the existing one.");
    }
}

/// Maps the global `--quiet` / `--debug` flags to a level override.
/// `--quiet` wins when both are given.
pub fn level_for_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for_flags(true, true), Some(LevelFilter::Off));
        assert_eq!(level_for_flags(false, true), Some(LevelFilter::Debug));
        assert_eq!(level_for_flags(false, false), None);
    }

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        init_logger(Some(LevelFilter::Off));
        init_logger(None);
    }
}
