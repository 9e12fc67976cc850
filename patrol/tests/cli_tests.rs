// patrol/tests/cli_tests.rs
//! Command-line integration tests for the `patrol` binary.
//!
//! The tests run the compiled binary through `assert_cmd`, feed input through
//! stdin or temporary files, and assert on stdout JSON and exit codes
//! (0 pass, 1 failed scan, 2 error).

use anyhow::Result;
#[allow(unused_imports)]
use predicates::prelude::*;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

use assert_cmd::Command;

/// Runs `patrol` with `args`, feeding `input` through stdin.
fn run_patrol(input: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("patrol").unwrap();
    cmd.env("RUST_LOG", "debug");
    cmd.args(args).write_stdin(input).assert()
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
    let output = assert.get_output();
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_clean_document_exits_zero() {
    let assert = run_patrol(r#"{"name": "Alice", "bio": "Hello there"}"#, &["scan"]).success();
    assert_eq!(stdout_json(&assert), json!({"ok": true, "issues": []}));
}

#[test]
fn test_failing_document_exits_one_with_paths() {
    let assert = run_patrol(r#"{"user": {"bio": "<script>x</script>"}}"#, &["scan"]).code(1);
    let result = stdout_json(&assert);
    assert_eq!(result["ok"], json!(false));
    assert_eq!(result["issues"][0]["path"], json!(["user", "bio"]));
    assert_eq!(result["issues"][0]["rule"], json!("scripts"));
}

#[test]
fn test_strip_mode_prints_sanitized_value() {
    let assert = run_patrol("\"<script>bad</script>Hello\"", &["scan", "--adapter", "strip"]).success();
    let result = stdout_json(&assert);
    assert_eq!(result["ok"], json!(true));
    assert_eq!(result["value"], json!("Hello"));
}

#[test]
fn test_prototype_pollution_exits_one() {
    let assert = run_patrol(r#"{"__proto__": {"admin": true}}"#, &["scan"]).code(1);
    let result = stdout_json(&assert);
    assert_eq!(result["issues"][0]["details"]["reason"], json!("prototype_pollution"));
}

#[test]
fn test_invalid_json_exits_two() {
    run_patrol("{not json", &["scan"])
        .code(2)
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_raw_text_scan() {
    run_patrol("' OR 1=1 --\n", &["scan", "--raw"])
        .code(1)
        .stdout(predicate::str::contains("\"rule\":\"sql\""));
}

#[test]
fn test_explicit_checks_with_profanity_list() -> Result<()> {
    let mut list = NamedTempFile::new()?;
    writeln!(list, "word1")?;
    let path = list.path().to_str().unwrap().to_string();

    let assert = run_patrol(
        "\"word1 word2\"",
        &["scan", "--checks", "badwords,sql", "--profanity-list", &path],
    )
    .code(1);
    let result = stdout_json(&assert);
    assert_eq!(result["issues"][0]["rule"], json!("badwords"));
    assert_eq!(result["issues"][0]["details"]["hits"], json!(["word1"]));
    Ok(())
}

#[test]
fn test_config_file_and_input_file() -> Result<()> {
    let mut config = NamedTempFile::new()?;
    writeln!(config, "allow_html: true\nadapter: warn")?;
    let mut input = NamedTempFile::new()?;
    write!(input, r#"["<p>Hello</p>", "fine"]"#)?;

    let mut cmd = Command::cargo_bin("patrol")?;
    cmd.args(["scan", "--pretty", "--config"])
        .arg(config.path())
        .arg("--input")
        .arg(input.path());
    cmd.assert().success().stdout(predicate::str::contains("\"ok\": true"));
    Ok(())
}

#[test]
fn test_missing_config_exits_two() {
    run_patrol("\"x\"", &["scan", "--config", "/no/such/patrol.yaml"])
        .code(2)
        .stderr(predicate::str::contains("/no/such/patrol.yaml"));
}

#[test]
fn test_unknown_adapter_is_a_usage_error() {
    run_patrol("\"x\"", &["scan", "--adapter", "loud"]).code(2);
}

#[test]
fn test_sentiment_of_argument() {
    let assert = run_patrol("", &["sentiment", "This is great and I love it"]).success();
    let result = stdout_json(&assert);
    assert_eq!(result["mood"], json!("positive"));
    assert_eq!(result["score"], json!(2));
}

#[test]
fn test_sentiment_each_leaf() {
    let assert = run_patrol(r#"{"a": "awful", "b": ["fine"]}"#, &["sentiment", "--each"]).success();
    let rows = stdout_json(&assert);
    assert_eq!(rows[0]["path"], json!(["a"]));
    assert_eq!(rows[0]["mood"], json!("negative"));
    assert_eq!(rows[1]["path"], json!(["b", 0]));
}

#[test]
fn test_sanitize_text() {
    run_patrol("", &["sanitize", "--strip-html", "  <b>hi</b>   there  "])
        .success()
        .stdout("hi there\n");
}

#[test]
fn test_checks_lists_builtins() {
    run_patrol("", &["checks"])
        .success()
        .stdout("badwords\nsql\nscripts\nhtml\nlimit\nsentiment\n");
}

#[test]
fn test_quiet_flag_silences_logs() {
    run_patrol("\"hello\"", &["--quiet", "scan"])
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_sanitize_composes_unicode() {
    run_patrol("", &["sanitize", "cafe\u{301}"])
        .success()
        .stdout("caf\u{e9}\n");
    run_patrol("", &["sanitize", "--no-normalize", "cafe\u{301}"])
        .success()
        .stdout("cafe\u{301}\n");
}
