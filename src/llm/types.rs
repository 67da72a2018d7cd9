//! Wire-level types shared by every transport
//!
//! These mirror the single request shape the core depends on:
//! `createResponse(model, reasoningEffort, inputMessages[], tools?) -> {outputText}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Message Role
// ─────────────────────────────────────────────────────────────────

/// Author of an input message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instruction text supplied by the application
    Developer,
    /// The human participant
    User,
    /// The model (a previous persona reply)
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::Developer => "developer",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the ordered `input` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: MessageRole,
    pub content: String,
}

impl InputMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn developer(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Developer, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ─────────────────────────────────────────────────────────────────
// Reasoning Effort
// ─────────────────────────────────────────────────────────────────

/// How much hidden reasoning the model should spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    #[default]
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Minimal => "minimal",
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasoningEffort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(ReasoningEffort::Minimal),
            "low" => Ok(ReasoningEffort::Low),
            "medium" => Ok(ReasoningEffort::Medium),
            "high" => Ok(ReasoningEffort::High),
            _ => Err(format!(
                "Unknown reasoning effort '{}'. Valid: minimal, low, medium, high",
                s
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────────────────────────

/// Provider-hosted capability the model may invoke on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    WebSearch,
}

// ─────────────────────────────────────────────────────────────────
// Request / Response
// ─────────────────────────────────────────────────────────────────

/// A single non-streaming provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRequest {
    pub model: String,
    pub reasoning_effort: ReasoningEffort,
    pub input: Vec<InputMessage>,
    pub tools: Vec<Tool>,
}

impl ResponseRequest {
    pub fn new(model: impl Into<String>, reasoning_effort: ReasoningEffort) -> Self {
        Self {
            model: model.into(),
            reasoning_effort,
            input: Vec::new(),
            tools: Vec::new(),
        }
    }

    pub fn message(mut self, message: InputMessage) -> Self {
        self.input.push(message);
        self
    }

    pub fn messages(mut self, messages: impl IntoIterator<Item = InputMessage>) -> Self {
        self.input.extend(messages);
        self
    }

    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }
}

/// What the core reads back from a provider call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseOutput {
    /// Concatenated text output; empty when the provider produced none
    pub output_text: String,
}

impl ResponseOutput {
    pub fn text(output_text: impl Into<String>) -> Self {
        Self {
            output_text: output_text.into(),
        }
    }
}
