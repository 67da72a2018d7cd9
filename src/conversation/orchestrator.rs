//! Conversation Orchestrator
//!
//! One provider call per user turn. The caller appends the user turn to the
//! history before calling `respond` and appends the reply afterwards; the
//! orchestrator itself never touches the history.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::AppConfig;
use crate::error::Result;
use crate::llm::{InputMessage, LlmGateway, ReasoningEffort, ResponseRequest};
use crate::persona::PersonaProfile;

use super::context::{ContextPolicy, ContextWindow};
use super::prompts::{grounding_block, BEHAVIOR_INSTRUCTIONS};
use super::turn::Turn;

/// Default chat model
pub const DEFAULT_CHAT_MODEL: &str = "gpt-5";

/// Produces persona replies grounded in a profile
#[derive(Debug, Clone)]
pub struct ConversationOrchestrator {
    gateway: Arc<LlmGateway>,
    model: String,
    reasoning_effort: ReasoningEffort,
    context: Arc<dyn ContextPolicy>,
}

impl ConversationOrchestrator {
    pub fn new(gateway: Arc<LlmGateway>) -> Self {
        Self {
            gateway,
            model: DEFAULT_CHAT_MODEL.to_string(),
            reasoning_effort: ReasoningEffort::Low,
            context: Arc::new(ContextWindow::FullHistory),
        }
    }

    pub fn from_config(gateway: Arc<LlmGateway>, config: &AppConfig) -> Result<Self> {
        Ok(Self::new(gateway)
            .with_model(config.openai.chat_model.clone())
            .with_reasoning_effort(config.reasoning_effort()?)
            .with_context_policy(config.context_window()?))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = effort;
        self
    }

    pub fn with_context_policy(mut self, policy: impl ContextPolicy + 'static) -> Self {
        self.context = Arc::new(policy);
        self
    }

    /// Instruction, grounding block, then the selected history, in that order
    pub fn build_request(&self, history: &[Turn], profile: &PersonaProfile) -> ResponseRequest {
        let selected = self.context.select(history);

        ResponseRequest::new(&self.model, self.reasoning_effort)
            .message(InputMessage::developer(BEHAVIOR_INSTRUCTIONS))
            .message(InputMessage::developer(grounding_block(profile)))
            .messages(selected.iter().map(InputMessage::from))
    }

    /// Ask the persona for its next reply. An empty provider body is
    /// returned as an empty string.
    #[instrument(skip_all, fields(model = %self.model, history = history.len()))]
    pub async fn respond(&self, history: &[Turn], profile: &PersonaProfile) -> Result<String> {
        let client = self.gateway.client()?;
        let request = self.build_request(history, profile);
        debug!(
            sent_turns = request.input.len().saturating_sub(2),
            "Requesting persona reply"
        );

        let output = client.create_response(request).await?;
        debug!(reply_len = output.output_text.len(), "Persona replied");
        Ok(output.output_text)
    }
}
