//! Configuration system for persona-sim
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. Explicit `--config` path
//! 2. Environment variables (`OPENAI_*` and `PERSONA_SIM_*`), including a `.env` file
//! 3. Configuration file (TOML)
//! 4. Default values
//!
//! A missing API key is deliberately not a validation failure here; the
//! gateway reports it lazily the first time a client is needed.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::conversation::ContextWindow;
use crate::error::{Error, Result};
use crate::llm::ReasoningEffort;

/// Name of the credential variable read from the environment
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// LLM provider settings
    pub openai: OpenAiSettings,

    /// Persona synthesis settings
    pub persona: PersonaSettings,

    /// Conversation settings
    pub conversation: ConversationSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// OpenAI-compatible Responses API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// API base URL
    pub base_url: String,

    /// API key (normally supplied through OPENAI_API_KEY)
    pub api_key: String,

    /// Model used for persona conversation
    pub chat_model: String,

    /// Model used for the web-enabled research call
    pub research_model: String,

    /// Reasoning effort: minimal, low, medium, high
    pub reasoning_effort: String,

    /// HTTP timeout in seconds (0 = wait indefinitely)
    pub timeout_secs: u64,
}

/// Persona synthesis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaSettings {
    /// Token substituted for every literal occurrence of the supplied full name
    pub redaction_marker: String,

    /// Offer the web search tool on the research call
    pub web_search: bool,
}

/// Conversation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationSettings {
    /// History policy: "full" (resend every turn) or "sliding"
    pub context_window: String,

    /// Number of most recent turns kept by the sliding window
    pub max_turns: usize,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            chat_model: "gpt-5".to_string(),
            research_model: "gpt-5".to_string(),
            reasoning_effort: "low".to_string(),
            timeout_secs: 0,
        }
    }
}

impl Default for PersonaSettings {
    fn default() -> Self {
        Self {
            redaction_marker: "[redacted]".to_string(),
            web_search: true,
        }
    }
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            context_window: "full".to_string(),
            max_turns: 40,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // A missing .env is the normal case
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        let mut config = Self::default();

        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|source| Error::IoRead {
                path: path.clone(),
                source,
            })?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                message: format!("{}: {}", path.display(), e.message()),
                source: Some(e),
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        config.apply_env_overrides();
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        let search_paths = [
            Some(PathBuf::from("persona-sim.toml")),
            dirs::config_dir().map(|p| p.join("persona-sim").join("config.toml")),
            dirs::home_dir().map(|p| p.join(".persona-sim").join("config.toml")),
        ];

        for path in search_paths.into_iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(API_KEY_VAR) {
            self.openai.api_key = val;
        }
        if let Ok(val) = std::env::var("OPENAI_BASE_URL") {
            self.openai.base_url = val;
        }
        if let Ok(val) = std::env::var("OPENAI_MODEL_CHAT") {
            self.openai.chat_model = val;
        }
        if let Ok(val) = std::env::var("OPENAI_MODEL_RESEARCH") {
            self.openai.research_model = val;
        }
        if let Ok(val) = std::env::var("OPENAI_REASONING_EFFORT") {
            self.openai.reasoning_effort = val;
        }
        if let Ok(val) = std::env::var("PERSONA_SIM_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.openai.timeout_secs = n;
            }
        }

        if let Ok(val) = std::env::var("PERSONA_SIM_REDACTION_MARKER") {
            self.persona.redaction_marker = val;
        }

        if let Ok(val) = std::env::var("PERSONA_SIM_CONTEXT_WINDOW") {
            self.conversation.context_window = val;
        }
        if let Ok(val) = std::env::var("PERSONA_SIM_MAX_TURNS") {
            if let Ok(n) = val.parse() {
                self.conversation.max_turns = n;
            }
        }

        if let Ok(val) = std::env::var("PERSONA_SIM_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("PERSONA_SIM_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("PERSONA_SIM_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match url::Url::parse(&self.openai.base_url) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
            Ok(_) => {
                return Err(Error::config_field_invalid(
                    "openai.base_url",
                    "base_url must start with http:// or https://",
                ))
            }
            Err(e) => {
                return Err(Error::config_field_invalid(
                    "openai.base_url",
                    format!("invalid base_url '{}': {}", self.openai.base_url, e),
                ))
            }
        }

        if self.openai.chat_model.trim().is_empty() || self.openai.research_model.trim().is_empty() {
            return Err(Error::config_validation("Model identifiers cannot be empty"));
        }

        self.reasoning_effort()?;
        self.context_window()?;

        if self.persona.redaction_marker.is_empty() {
            return Err(Error::config_field_invalid(
                "persona.redaction_marker",
                "redaction_marker cannot be empty",
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Parsed reasoning effort
    pub fn reasoning_effort(&self) -> Result<ReasoningEffort> {
        self.openai
            .reasoning_effort
            .parse()
            .map_err(|msg: String| Error::config_field_invalid("openai.reasoning_effort", msg))
    }

    /// History policy selected by `[conversation]`
    pub fn context_window(&self) -> Result<ContextWindow> {
        match self.conversation.context_window.to_lowercase().as_str() {
            "full" => Ok(ContextWindow::FullHistory),
            "sliding" if self.conversation.max_turns == 0 => Err(Error::config_field_invalid(
                "conversation.max_turns",
                "max_turns must be greater than 0 for the sliding window",
            )),
            "sliding" => Ok(ContextWindow::SlidingWindow {
                max_turns: self.conversation.max_turns,
            }),
            other => Err(Error::config_field_invalid(
                "conversation.context_window",
                format!("Unknown context window '{}'. Must be one of: full, sliding", other),
            )),
        }
    }

    /// Copy of the configuration safe to print (API key masked)
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        if !shown.openai.api_key.is_empty() {
            shown.openai.api_key = mask_secret(&shown.openai.api_key);
        }
        shown
    }
}

/// Keep the first four characters of a secret and mask the rest
fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{}****", prefix)
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file, returning where it was written
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".persona-sim")
                .join("config.toml")
        });

    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::IoWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|source| Error::IoWrite {
        path: config_path.clone(),
        source,
    })?;

    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# persona-sim configuration

[openai]
# Responses API base URL
base_url = "https://api.openai.com/v1"

# Leave empty and export OPENAI_API_KEY (or use a .env file) instead
api_key = ""

# Model used while chatting with the persona
chat_model = "gpt-5"

# Model used for the web-enabled research call
research_model = "gpt-5"

# minimal, low, medium, high
reasoning_effort = "low"

# HTTP timeout in seconds (0 = wait indefinitely)
timeout_secs = 0

[persona]
# Replaces every literal occurrence of the supplied full name
redaction_marker = "[redacted]"

# Let the research call use web search
web_search = true

[conversation]
# "full" resends the entire history on every turn; "sliding" keeps the last max_turns
context_window = "full"
max_turns = 40

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.persona-sim/logs/persona-sim.log"

max_file_size_mb = 100
max_files = 5
json_format = false
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.openai.chat_model, "gpt-5");
        assert_eq!(config.openai.reasoning_effort, "low");
        assert_eq!(config.persona.redaction_marker, "[redacted]");
        assert_eq!(config.conversation.context_window, "full");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override() {
        env::set_var("OPENAI_MODEL_CHAT", "gpt-test-chat");
        env::set_var("PERSONA_SIM_MAX_TURNS", "12");
        env::set_var("PERSONA_SIM_LOG_JSON", "1");

        let mut config = AppConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.openai.chat_model, "gpt-test-chat");
        assert_eq!(config.conversation.max_turns, 12);
        assert!(config.logging.json_format);

        env::remove_var("OPENAI_MODEL_CHAT");
        env::remove_var("PERSONA_SIM_MAX_TURNS");
        env::remove_var("PERSONA_SIM_LOG_JSON");
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut config = AppConfig::default();
        config.openai.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.openai.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_effort() {
        let mut config = AppConfig::default();
        config.openai.reasoning_effort = "extreme".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("extreme"));
    }

    #[test]
    fn test_validation_sliding_requires_turns() {
        let mut config = AppConfig::default();
        config.conversation.context_window = "sliding".to_string();
        config.conversation.max_turns = 0;
        assert!(config.validate().is_err());

        config.conversation.max_turns = 6;
        assert_eq!(
            config.context_window().unwrap(),
            ContextWindow::SlidingWindow { max_turns: 6 }
        );
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_marker() {
        let mut config = AppConfig::default();
        config.persona.redaction_marker = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redacted_masks_key() {
        let mut config = AppConfig::default();
        config.openai.api_key = "sk-secret-value".to_string();
        let shown = config.redacted();
        assert_eq!(shown.openai.api_key, "sk-s****");
        assert_eq!(config.openai.api_key, "sk-secret-value");
    }

    #[test]
    fn test_parse_config_file() {
        let config_str = r#"
[openai]
chat_model = "gpt-5-mini"
reasoning_effort = "medium"

[conversation]
context_window = "sliding"
max_turns = 10
"#;

        let config: AppConfig = toml::from_str(config_str).unwrap();

        assert_eq!(config.openai.chat_model, "gpt-5-mini");
        assert_eq!(config.openai.research_model, "gpt-5");
        assert_eq!(config.reasoning_effort().unwrap(), ReasoningEffort::Medium);
        assert_eq!(config.conversation.max_turns, 10);
        assert_eq!(config.persona.redaction_marker, "[redacted]");
    }

    #[test]
    fn test_default_config_file_parses() {
        let config: AppConfig = toml::from_str(&generate_default_config()).unwrap();
        assert!(config.validate().is_ok());
    }
}
