// patrol/src/cli.rs
//! This file defines the command-line interface (CLI) for the patrol application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand, ValueEnum};
use patrol_core::AdapterMode;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "patrol",
    author = "Payload Patrol Team",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect JSON payloads for injection, markup and profanity",
    long_about = "Patrol runs heuristic checks (SQL injection, inline scripts, HTML tags, profanity, length limits) over every string in a JSON document and reports path-tagged issues, or prints a sanitized copy of the document in strip mode.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all log output.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `patrol` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scans a JSON document (file or stdin) and prints the scan result as JSON.
    #[command(about = "Scan a JSON document and print the result. Exits 1 when the document fails.")]
    Scan(ScanCommand),

    /// Scores the sentiment of a text, or of every string in a JSON document.
    #[command(about = "Score the sentiment of a text or of every string in a JSON document.")]
    Sentiment(SentimentCommand),

    /// Normalises a text: control characters, whitespace and optionally tags.
    #[command(about = "Normalise control characters and whitespace in a text.")]
    Sanitize(SanitizeCommand),

    /// Lists the registered check names.
    #[command(about = "List the names of all built-in checks.")]
    Checks,
}

/// Adapter mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AdapterChoice {
    /// Stop at the first failing check per string
    Block,
    /// Report every failing check
    Warn,
    /// Remove script constructs and print the sanitized document
    Strip,
}

impl From<AdapterChoice> for AdapterMode {
    fn from(choice: AdapterChoice) -> Self {
        match choice {
            AdapterChoice::Block => AdapterMode::Block,
            AdapterChoice::Warn => AdapterMode::Warn,
            AdapterChoice::Strip => AdapterMode::Strip,
        }
    }
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug, Default)]
pub struct ScanCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long = "input", short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Path to a YAML session configuration.
    #[arg(long = "config", short = 'c', value_name = "FILE", env = "PATROL_CONFIG", help = "Path to a YAML session configuration file.")]
    pub config: Option<PathBuf>,

    /// Overrides the adapter mode of the configuration.
    #[arg(long = "adapter", short = 'a', value_enum, value_name = "MODE", help = "Adapter mode: block, warn or strip.")]
    pub adapter: Option<AdapterChoice>,

    /// Run exactly these checks instead of the configured set (comma-separated).
    #[arg(long = "checks", value_delimiter = ',', value_name = "NAMES", help = "Run exactly these checks, in order (comma-separated).")]
    pub checks: Vec<String>,

    /// File of profanity terms, one per line, replacing the built-in list.
    #[arg(long = "profanity-list", value_name = "FILE", help = "Replace the built-in profanity list with the terms in this file (one per line).")]
    pub profanity_list: Option<PathBuf>,

    /// Terms exempt from the profanity check (repeatable).
    #[arg(long = "allow", value_name = "TERM", help = "Exempt a term from the profanity check. May be repeated.")]
    pub allow: Vec<String>,

    /// Maximum nesting depth to descend.
    #[arg(long = "max-depth", value_name = "N", help = "Maximum container nesting depth to descend.")]
    pub max_depth: Option<usize>,

    /// Treat the whole input as one string instead of parsing JSON.
    #[arg(long = "raw", help = "Treat the input as a single string instead of a JSON document.")]
    pub raw: bool,

    /// Pretty-print the JSON output.
    #[arg(long = "pretty", help = "Pretty-print the JSON output.")]
    pub pretty: bool,
}

/// Arguments for the `sentiment` command.
#[derive(Parser, Debug, Default)]
pub struct SentimentCommand {
    /// Text to analyse (reads input when omitted).
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long = "input", short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Parse the input as JSON and score every string in it.
    #[arg(long = "each", help = "Parse the input as JSON and score every string leaf.")]
    pub each: bool,

    /// Pretty-print the JSON output.
    #[arg(long = "pretty", help = "Pretty-print the JSON output.")]
    pub pretty: bool,
}

/// Arguments for the `sanitize` command.
#[derive(Parser, Debug, Default)]
pub struct SanitizeCommand {
    /// Text to sanitize (reads input when omitted).
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long = "input", short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Also remove anything that looks like a tag.
    #[arg(long = "strip-html", help = "Remove anything that looks like an HTML tag.")]
    pub strip_html: bool,

    /// Keep whitespace runs as they are.
    #[arg(long = "keep-whitespace", help = "Do not collapse whitespace or trim the ends.")]
    pub keep_whitespace: bool,

    /// Keep control characters and escape sequences.
    #[arg(long = "keep-controls", help = "Do not remove control characters or ANSI escape sequences.")]
    pub keep_controls: bool,

    /// Skip Unicode NFC normalization.
    #[arg(long = "no-normalize", help = "Do not apply Unicode NFC normalization.")]
    pub no_normalize: bool,
}
