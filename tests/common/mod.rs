//! Common test utilities and fixtures
//!
//! Builds sessions wired to the in-process mock transport.

#![allow(dead_code)]

use std::sync::Arc;

use persona_sim::conversation::ConversationOrchestrator;
use persona_sim::llm::mock::{MockTransport, MockTransportFactory};
use persona_sim::llm::{GatewaySettings, LlmGateway};
use persona_sim::persona::{IdentityHints, PersonaSynthesizer};
use persona_sim::session::PersonaSession;

/// Gateway settings that never consult the process environment
pub fn test_settings() -> GatewaySettings {
    GatewaySettings {
        base_url: "http://localhost:9".to_string(),
        api_key: "sk-test".to_string(),
        api_key_env: None,
        timeout_secs: 0,
    }
}

/// Gateway handing out the given mock
pub fn mock_gateway(transport: Arc<MockTransport>) -> Arc<LlmGateway> {
    Arc::new(LlmGateway::new(
        test_settings(),
        MockTransportFactory::shared(transport),
    ))
}

/// Session whose synthesizer and orchestrator share one mock gateway
pub fn mock_session(transport: Arc<MockTransport>) -> PersonaSession {
    let gateway = mock_gateway(transport);
    PersonaSession::new(
        PersonaSynthesizer::new(Arc::clone(&gateway)),
        ConversationOrchestrator::new(gateway),
    )
}

/// The hints used throughout the end-to-end scenarios
pub fn ada_hints() -> IdentityHints {
    IdentityHints::new()
        .with_full_name("Ada Lovelace")
        .with_linkedin_url("")
        .with_x_url("")
        .with_additional_info("mathematician")
}
