// patrol/src/commands/sentiment.rs
//! `patrol sentiment`: prints a sentiment analysis as JSON.

use anyhow::{Context, Result};
use serde::Serialize;

use patrol_core::text::DEFAULT_PREVIEW_CHARS;
use patrol_core::{analyze_sentiment, preview, walk_strings, PathSegment, Payload, SentimentResult};

use crate::cli::SentimentCommand;
use crate::commands::{read_input, trim_line_end, write_json};

/// Sentiment of one string leaf in `--each` mode.
#[derive(Debug, Serialize)]
pub struct LeafSentiment {
    pub path: Vec<PathSegment>,
    pub preview: String,
    #[serde(flatten)]
    pub sentiment: SentimentResult,
}

pub fn run_sentiment(cmd: &SentimentCommand) -> Result<bool> {
    let text = match &cmd.text {
        Some(text) => text.clone(),
        None => read_input(cmd.input_file.as_deref())?,
    };

    if cmd.each {
        let payload: Payload = serde_json::from_str(&text).context("Input is not valid JSON")?;
        write_json(&score_leaves(&payload), cmd.pretty)?;
    } else {
        write_json(&analyze_sentiment(trim_line_end(&text)), cmd.pretty)?;
    }
    Ok(true)
}

/// Scores every string in `payload`, in walk order.
pub fn score_leaves(payload: &Payload) -> Vec<LeafSentiment> {
    walk_strings(payload)
        .into_iter()
        .map(|(path, value)| LeafSentiment {
            path,
            preview: preview(value, DEFAULT_PREVIEW_CHARS),
            sentiment: analyze_sentiment(value),
        })
        .collect()
}
