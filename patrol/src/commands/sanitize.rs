// patrol/src/commands/sanitize.rs
//! `patrol sanitize`: normalises a text and prints it.

use anyhow::Result;
use log::debug;
use std::io::{self, Write};

use patrol_core::{sanitize_string, SanitizeOptions};

use crate::cli::SanitizeCommand;
use crate::commands::read_input;

pub fn run_sanitize(cmd: &SanitizeCommand) -> Result<bool> {
    let input = match &cmd.text {
        Some(text) => text.clone(),
        None => read_input(cmd.input_file.as_deref())?,
    };
    let cleaned = sanitize_string(&input, options_for(cmd));
    debug!(
        "Sanitized {} byte(s) of input into {} byte(s).",
        input.len(),
        cleaned.len()
    );

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    writeln!(writer, "{}", cleaned)?;
    Ok(true)
}

fn options_for(cmd: &SanitizeCommand) -> SanitizeOptions {
    SanitizeOptions {
        normalize: !cmd.no_normalize,
        collapse_whitespace: !cmd.keep_whitespace,
        strip_controls: !cmd.keep_controls,
        strip_html: cmd.strip_html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_to_options() {
        let opts = options_for(&SanitizeCommand {
            strip_html: true,
            keep_whitespace: true,
            ..Default::default()
        });
        assert!(opts.strip_html);
        assert!(!opts.collapse_whitespace);
        assert!(opts.strip_controls);
        assert!(opts.normalize);
        assert!(!options_for(&SanitizeCommand {
            no_normalize: true,
            ..Default::default()
        })
        .normalize);
        assert_eq!(options_for(&SanitizeCommand::default()), SanitizeOptions::default());
    }
}
