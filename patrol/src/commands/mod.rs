// patrol/src/commands/mod.rs
//! Subcommand implementations.
//!
//! Each command returns `Ok(true)` when its input passed, `Ok(false)` when the
//! command ran but the input failed (only `scan` can report that), and an
//! error for usage, I/O or configuration problems.
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::Path;

use patrol_core::CheckCatalog;

use crate::cli::Commands;

pub mod sanitize;
pub mod scan;
pub mod sentiment;

/// Runs the selected subcommand.
pub async fn dispatch(command: Commands) -> Result<bool> {
    match command {
        Commands::Scan(cmd) => scan::run_scan(&cmd).await,
        Commands::Sentiment(cmd) => sentiment::run_sentiment(&cmd),
        Commands::Sanitize(cmd) => sanitize::run_sanitize(&cmd),
        Commands::Checks => run_list_checks(),
    }
}

/// Prints the built-in check names, one per line.
pub fn run_list_checks() -> Result<bool> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    for name in CheckCatalog::with_builtins().list() {
        writeln!(writer, "{}", name)?;
    }
    Ok(true)
}

/// Reads the whole input from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            debug!("Reading input from file: {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))
        }
        None => {
            debug!("Reading input from stdin.");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Writes `value` to stdout as one JSON document.
pub fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    writeln!(writer, "{}", rendered)?;
    Ok(())
}

/// Drops the line terminator a shell or editor leaves at the end of input.
pub(crate) fn trim_line_end(input: &str) -> &str {
    input.trim_end_matches(['\n', '\r'])
}
