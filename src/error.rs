//! Error types for persona-sim
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI
//!
//! The core never retries and never swallows errors: every variant here
//! unwinds to the immediate caller.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for persona-sim operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,
    MissingCredential = 110,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoNotFound = 203,

    // Provider errors (3xx)
    ProviderRequest = 300,
    ProviderTimeout = 301,
    ProviderStatus = 302,
    ProviderMalformed = 303,

    // Input errors (4xx)
    EmptyHints = 400,

    // Session errors (5xx)
    NoPersona = 500,
    SessionBusy = 501,
    Cancelled = 502,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E110")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            400..=499 => 40,
            500..=599 => 50,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// No API credential could be resolved for the LLM provider
    #[error("{variable} not set. Add it to your environment or .env file.")]
    MissingCredential { variable: String },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Provider Errors
    // ─────────────────────────────────────────────────────────────

    /// The request never produced an HTTP response
    #[error("Provider request failed: {message}")]
    ProviderRequest { message: String, timeout: bool },

    /// The provider answered with a non-success status
    #[error("Provider returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    /// The provider answered with a body we could not decode
    #[error("Malformed provider response: {message}")]
    ProviderMalformed { message: String },

    // ─────────────────────────────────────────────────────────────
    // Input / Session Errors
    // ─────────────────────────────────────────────────────────────

    /// Every identity hint was blank
    #[error("Please provide at least a name or one source link or additional info")]
    EmptyHints,

    /// A chat turn was submitted before any persona was synthesized
    #[error("No persona is active in this session")]
    NoPersona,

    /// Another call is already in flight for this session
    #[error("A request is already in progress for this session")]
    SessionBusy,

    /// The in-flight call was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::MissingCredential { .. } => ErrorCode::MissingCredential,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::ProviderRequest { timeout: true, .. } => ErrorCode::ProviderTimeout,
            Error::ProviderRequest { .. } => ErrorCode::ProviderRequest,
            Error::ProviderStatus { .. } => ErrorCode::ProviderStatus,
            Error::ProviderMalformed { .. } => ErrorCode::ProviderMalformed,

            Error::EmptyHints => ErrorCode::EmptyHints,

            Error::NoPersona => ErrorCode::NoPersona,
            Error::SessionBusy => ErrorCode::SessionBusy,
            Error::Cancelled => ErrorCode::Cancelled,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether resubmitting the same action might succeed.
    ///
    /// Informational only; nothing inside the crate acts on it.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::ProviderRequest { .. } | Error::SessionBusy | Error::Cancelled => true,
            Error::ProviderStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether the error stems from configuration and aborts any LLM operation
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound { .. }
                | Error::ConfigParse { .. }
                | Error::ConfigValidation { .. }
                | Error::MissingCredential { .. }
                | Error::Internal(_)
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'persona-sim config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'persona-sim config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::MissingCredential { .. } => Some(
                "Export OPENAI_API_KEY or put OPENAI_API_KEY=... in a .env file in the working directory."
            ),
            Error::ProviderRequest { timeout: true, .. } => Some(
                "The provider did not answer in time. Raise 'timeout_secs' under [openai] or resubmit."
            ),
            Error::ProviderRequest { .. } => Some(
                "Check your network connection and the [openai] base_url, then resubmit."
            ),
            Error::ProviderStatus { status: 401, .. } | Error::ProviderStatus { status: 403, .. } => {
                Some("The provider rejected the API key. Verify OPENAI_API_KEY.")
            }
            Error::ProviderStatus { status: 429, .. } => Some(
                "The provider is rate limiting requests. Wait a moment and resubmit."
            ),
            Error::EmptyHints => Some(
                "Pass at least one of --name, --linkedin, --x or --info."
            ),
            Error::NoPersona => Some("Create a persona before sending messages."),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            self.code().as_str(),
            self
        );

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound { path: path.into() }
    }

    /// Create a config parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Error::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a missing credential error for the given variable name
    pub fn missing_credential(variable: impl Into<String>) -> Self {
        Error::MissingCredential {
            variable: variable.into(),
        }
    }

    /// Create a malformed provider response error
    pub fn provider_malformed(message: impl Into<String>) -> Self {
        Error::ProviderMalformed {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::provider_malformed(e.to_string())
        } else {
            Error::ProviderRequest {
                timeout: e.is_timeout(),
                message: e.to_string(),
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
