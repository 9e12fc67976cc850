//! text.rs - Small string helpers used around a scan.
//!
//! None of these run as checks. They exist for callers that want to show an
//! offending value in a log line (`preview`), normalise free text before
//! storing it (`sanitize_string`) or enumerate the string leaves of a payload
//! (`walk_strings`).
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::payload::{PathSegment, Payload};
use crate::security::compile_pattern;

static WHITESPACE_RUN: Lazy<Option<Regex>> = Lazy::new(|| compile_pattern(r"\s+"));
static ANY_TAG: Lazy<Option<Regex>> = Lazy::new(|| compile_pattern(r"<[^>]+>"));

/// Default width of [`preview`].
pub const DEFAULT_PREVIEW_CHARS: usize = 50;

/// Truncates `value` to `max_chars` characters, appending `…` when cut.
pub fn preview(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &value[..cut]),
        None => value.to_string(),
    }
}

/// Switches for [`sanitize_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Apply Unicode NFC normalization first.
    pub normalize: bool,
    /// Collapse whitespace runs to one space and trim the ends.
    pub collapse_whitespace: bool,
    /// Remove ANSI escape sequences, then turn remaining control characters
    /// into spaces.
    pub strip_controls: bool,
    /// Remove anything that looks like a tag.
    pub strip_html: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            collapse_whitespace: true,
            strip_controls: true,
            strip_html: false,
        }
    }
}

/// Normalises free text. Steps run in a fixed order: NFC, controls,
/// whitespace, tags.
pub fn sanitize_string(input: &str, opts: SanitizeOptions) -> String {
    let mut out = if opts.normalize {
        input.nfc().collect::<String>()
    } else {
        input.to_string()
    };

    if opts.strip_controls {
        if out.contains('\u{1b}') {
            out = strip_ansi_escapes::strip_str(&out);
        }
        out = out
            .chars()
            .map(|c| if matches!(c, '\u{0}'..='\u{1f}' | '\u{7f}') { ' ' } else { c })
            .collect();
    }

    if opts.collapse_whitespace {
        if let Some(rx) = WHITESPACE_RUN.as_ref() {
            let collapsed = rx.replace_all(&out, " ").trim().to_string();
            out = collapsed;
        }
    }

    if opts.strip_html {
        if let Some(rx) = ANY_TAG.as_ref() {
            out = rx.replace_all(&out, "").into_owned();
        }
    }

    out
}

/// Every string leaf of `value` with its path, in walk order.
///
/// Sequences and mappings are entered at any depth; other values are skipped.
pub fn walk_strings(value: &Payload) -> Vec<(Vec<PathSegment>, &str)> {
    let mut out = Vec::new();
    collect_strings(value, &mut Vec::new(), &mut out);
    out
}

fn collect_strings<'a>(
    value: &'a Payload,
    path: &mut Vec<PathSegment>,
    out: &mut Vec<(Vec<PathSegment>, &'a str)>,
) {
    match value {
        Payload::String(s) => out.push((path.clone(), s.as_str())),
        Payload::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(PathSegment::Index(i));
                collect_strings(item, path, out);
                path.pop();
            }
        }
        Payload::Mapping(mapping) => {
            for (key, item) in mapping.iter() {
                path.push(PathSegment::Key(key.to_string()));
                collect_strings(item, path, out);
                path.pop();
            }
        }
        _ => {}
    }
}
