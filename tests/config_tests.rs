//! Configuration system tests
//!
//! Tests configuration loading, validation, and file generation

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use persona_sim::config::{init_config, AppConfig};
use persona_sim::conversation::ContextWindow;
use persona_sim::error::ErrorCode;
use persona_sim::llm::ReasoningEffort;

/// Test fixture for configuration testing
struct ConfigFixture {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Self {
            _temp_dir: temp_dir,
            config_path,
        }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }
}

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_minimal_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[persona]
web_search = false
"#,
    );

    let config = AppConfig::load(Some(fixture.path())).unwrap();
    assert!(!config.persona.web_search);
    assert_eq!(config.persona.redaction_marker, "[redacted]");
    assert_eq!(config.context_window().unwrap(), ContextWindow::FullHistory);
}

#[test]
fn test_sliding_window_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[conversation]
context_window = "sliding"
max_turns = 10
"#,
    );

    let config = AppConfig::load(Some(fixture.path())).unwrap();
    assert_eq!(
        config.context_window().unwrap(),
        ContextWindow::SlidingWindow { max_turns: 10 }
    );
}

#[test]
fn test_effort_parsed() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[openai]
reasoning_effort = "medium"
"#,
    );

    let config = AppConfig::load(Some(fixture.path())).unwrap();
    // An exported OPENAI_REASONING_EFFORT would take precedence
    if std::env::var("OPENAI_REASONING_EFFORT").is_err() {
        assert_eq!(config.reasoning_effort().unwrap(), ReasoningEffort::Medium);
    }
}

#[test]
fn test_generated_config_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let path_str = path.to_str().unwrap();

    let written = init_config(Some(path_str), false).unwrap();
    assert_eq!(written, path);
    assert!(AppConfig::load(Some(path_str)).is_ok());
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_missing_explicit_file() {
    let err = AppConfig::load(Some("/nonexistent/persona-sim.toml")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigNotFound);
}

#[test]
fn test_malformed_toml() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[openai\nbase_url = ");

    let err = AppConfig::load(Some(fixture.path())).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigParseError);
}

#[test]
fn test_invalid_base_url() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[openai]
base_url = "ftp://example.com"
"#,
    );

    if std::env::var("OPENAI_BASE_URL").is_err() {
        let err = AppConfig::load(Some(fixture.path())).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigValidation);
    }
}

#[test]
fn test_zero_turn_sliding_window() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[conversation]
context_window = "sliding"
max_turns = 0
"#,
    );

    let err = AppConfig::load(Some(fixture.path())).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigValidation);
}

#[test]
fn test_init_refuses_overwrite_without_force() {
    let fixture = ConfigFixture::new();
    fixture.write_config("# existing\n");

    let err = init_config(Some(fixture.path()), false).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigValidation);
    assert_eq!(fs::read_to_string(&fixture.config_path).unwrap(), "# existing\n");

    init_config(Some(fixture.path()), true).unwrap();
    assert!(fs::read_to_string(&fixture.config_path)
        .unwrap()
        .contains("[openai]"));
}

#[test]
fn test_api_key_not_required_at_load() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[openai]\napi_key = \"\"\n");
    assert!(AppConfig::load(Some(fixture.path())).is_ok());
}
