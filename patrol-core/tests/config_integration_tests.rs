// patrol-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

use patrol_core::{AdapterMode, CheckCatalog, LimitConfig, Payload, PatrolConfig, Session, DEFAULT_MAX_DEPTH};

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
block_sqli: true
block_xss: false
allow_html: true
check_profanity: true
adapter: strip
allowlist:
  - scunthorpe
limit:
  max_chars: 280
  max_words: 50
max_depth: 8
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = PatrolConfig::load_from_file(file.path())?;
    assert_eq!(config.adapter, AdapterMode::Strip);
    assert_eq!(config.allowlist, vec!["scunthorpe"]);
    assert_eq!(config.limit, Some(LimitConfig { max_chars: Some(280), max_words: Some(50) }));
    assert_eq!(config.max_depth, 8);
    assert_eq!(config.check_names(), vec!["badwords", "sql", "limit"]);
    Ok(())
}

#[test]
fn test_empty_file_yields_defaults() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"{}\n")?;
    let config = PatrolConfig::load_from_file(file.path())?;
    assert_eq!(config, PatrolConfig::default());
    assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    Ok(())
}

#[test]
fn test_missing_file_reports_path() {
    let err = PatrolConfig::load_from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(format!("{:#}", err).contains("/definitely/not/here.yaml"));
}

#[test]
fn test_malformed_file_is_an_error() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"adapter: [not, a, mode]\n")?;
    assert!(PatrolConfig::load_from_file(file.path()).is_err());
    Ok(())
}

#[tokio::test]
async fn test_loaded_config_drives_a_session() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"allowHTML: true\nadapter: warn\n")?;
    let config = PatrolConfig::load_from_file(file.path())?;
    let session = Session::with_catalog(config, Arc::new(CheckCatalog::with_builtins()));
    assert_eq!(session.checks(), ["sql".to_string(), "scripts".to_string()]);

    let r = session.scan(&Payload::from("<p>fine</p>")).await;
    assert!(r.ok);
    Ok(())
}
