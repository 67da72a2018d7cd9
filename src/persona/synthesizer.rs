//! Persona Synthesizer
//!
//! One research call per synthesis: fixed instruction plus the rendered
//! hints, web search enabled, then trim and redact.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::llm::{InputMessage, LlmGateway, ReasoningEffort, ResponseRequest, Tool};

use super::prompts::{render_hints, research_instructions};
use super::redaction::Redactor;
use super::types::{IdentityHints, PersonaProfile, SynthesizedPersona};

/// Default research model
pub const DEFAULT_RESEARCH_MODEL: &str = "gpt-5";

/// Turns identity hints into a redacted persona profile
#[derive(Debug, Clone)]
pub struct PersonaSynthesizer {
    gateway: Arc<LlmGateway>,
    model: String,
    reasoning_effort: ReasoningEffort,
    web_search: bool,
    redactor: Redactor,
}

impl PersonaSynthesizer {
    pub fn new(gateway: Arc<LlmGateway>) -> Self {
        Self {
            gateway,
            model: DEFAULT_RESEARCH_MODEL.to_string(),
            reasoning_effort: ReasoningEffort::Low,
            web_search: true,
            redactor: Redactor::default(),
        }
    }

    pub fn from_config(gateway: Arc<LlmGateway>, config: &AppConfig) -> Result<Self> {
        Ok(Self::new(gateway)
            .with_model(config.openai.research_model.clone())
            .with_reasoning_effort(config.reasoning_effort()?)
            .with_web_search(config.persona.web_search)
            .with_redactor(Redactor::new(config.persona.redaction_marker.clone())))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = effort;
        self
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    pub fn with_redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Build the provider request for a set of hints
    pub fn build_request(&self, hints: &IdentityHints) -> ResponseRequest {
        let request = ResponseRequest::new(&self.model, self.reasoning_effort)
            .message(InputMessage::developer(research_instructions()))
            .message(InputMessage::user(render_hints(hints)));

        if self.web_search {
            request.tool(Tool::WebSearch)
        } else {
            request
        }
    }

    /// Research the person behind `hints` and return the redacted profile.
    ///
    /// Rejects all-blank hints before touching the provider. An empty
    /// provider body yields an empty profile, not an error.
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn synthesize(&self, hints: &IdentityHints) -> Result<SynthesizedPersona> {
        if hints.is_empty() {
            return Err(Error::EmptyHints);
        }

        let client = self.gateway.client()?;
        let request = self.build_request(hints);
        debug!(
            has_name = hints.full_name().is_some(),
            web_search = self.web_search,
            "Requesting persona research"
        );

        let output = client.create_response(request).await?;
        let text = output.output_text.trim();

        let (text, redactions, display_name) = match hints.full_name() {
            Some(name) => {
                let redacted = self.redactor.redact(text, name);
                (redacted.text, redacted.replacements, self.redactor.marker().to_string())
            }
            None => (text.to_string(), 0, String::new()),
        };

        info!(
            profile_len = text.len(),
            redactions,
            "Persona synthesized"
        );

        Ok(SynthesizedPersona {
            profile: PersonaProfile::new(text),
            display_name,
            redactions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::llm::mock::{MockTransport, MockTransportFactory};
    use crate::llm::{GatewaySettings, MessageRole};

    fn gateway(transport: Arc<MockTransport>) -> Arc<LlmGateway> {
        Arc::new(LlmGateway::new(
            GatewaySettings {
                base_url: "http://localhost:9".to_string(),
                api_key: "sk-test".to_string(),
                api_key_env: None,
                timeout_secs: 0,
            },
            MockTransportFactory::shared(transport),
        ))
    }

    #[tokio::test]
    async fn test_empty_hints_make_no_call() {
        let mock = Arc::new(MockTransport::fixed("unused"));
        let synth = PersonaSynthesizer::new(gateway(mock.clone()));

        let err = synth
            .synthesize(&IdentityHints::new().with_full_name("  "))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyHints);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let mock = Arc::new(MockTransport::fixed("profile"));
        let synth = PersonaSynthesizer::new(gateway(mock.clone()))
            .with_model("research-model")
            .with_reasoning_effort(ReasoningEffort::Medium);

        synth
            .synthesize(&IdentityHints::new().with_x_url("https://x.com/someone"))
            .await
            .unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.model, "research-model");
        assert_eq!(request.reasoning_effort, ReasoningEffort::Medium);
        assert_eq!(request.tools, vec![Tool::WebSearch]);
        assert_eq!(request.input.len(), 2);
        assert_eq!(request.input[0].role, MessageRole::Developer);
        assert_eq!(request.input[1].role, MessageRole::User);
        assert!(request.input[1].content.contains("- Full name: N/A"));
        assert!(request.input[1].content.contains("- X: https://x.com/someone"));
    }

    #[tokio::test]
    async fn test_web_search_can_be_disabled() {
        let mock = Arc::new(MockTransport::fixed("profile"));
        let synth = PersonaSynthesizer::new(gateway(mock.clone())).with_web_search(false);
        synth
            .synthesize(&IdentityHints::new().with_additional_info("chef"))
            .await
            .unwrap();
        assert!(mock.last_request().unwrap().tools.is_empty());
    }

    #[tokio::test]
    async fn test_name_redacted_and_display_name_set() {
        let mock = Arc::new(MockTransport::fixed(
            "  Ada Lovelace works on engines.\nAda Lovelace writes notes.  ",
        ));
        let synth = PersonaSynthesizer::new(gateway(mock));

        let persona = synth
            .synthesize(&IdentityHints::new().with_full_name("Ada Lovelace"))
            .await
            .unwrap();

        assert_eq!(
            persona.profile.as_str(),
            "[redacted] works on engines.\n[redacted] writes notes."
        );
        assert_eq!(persona.display_name, "[redacted]");
        assert_eq!(persona.redactions, 2);
    }

    #[tokio::test]
    async fn test_echoed_name_never_survives() {
        let mock = Arc::new(MockTransport::echo());
        let synth = PersonaSynthesizer::new(gateway(mock));

        let persona = synth
            .synthesize(&IdentityHints::new().with_full_name("Grace Hopper"))
            .await
            .unwrap();

        assert!(!persona.profile.as_str().contains("Grace Hopper"));
        assert!(persona.profile.as_str().contains("- Full name: [redacted]"));
    }

    #[tokio::test]
    async fn test_without_name_display_name_empty() {
        let mock = Arc::new(MockTransport::fixed(""));
        let synth = PersonaSynthesizer::new(gateway(mock));

        let persona = synth
            .synthesize(&IdentityHints::new().with_linkedin_url("https://linkedin.com/in/x"))
            .await
            .unwrap();

        assert!(persona.profile.is_empty());
        assert_eq!(persona.display_name, "");
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let mock = Arc::new(MockTransport::fixed("x").failing_on_call(1));
        let synth = PersonaSynthesizer::new(gateway(mock.clone()));

        let err = synth
            .synthesize(&IdentityHints::new().with_full_name("Ada Lovelace"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProviderStatus);
        assert_eq!(mock.call_count(), 1);
    }
}
