//! LLM Gateway
//!
//! Owns the provider binding. The first successful construction is kept for
//! the lifetime of the gateway and handed out on every later call; failed
//! constructions (most commonly a missing credential) are not remembered, so
//! the next call tries again.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::config::{AppConfig, API_KEY_VAR};
use crate::error::{Error, Result};

use super::openai::OpenAiTransportFactory;
use super::traits::{GatewaySettings, SharedTransport, TransportFactory};

/// Lazily-bound, explicitly owned provider client
pub struct LlmGateway {
    settings: GatewaySettings,
    factory: Box<dyn TransportFactory>,
    client: OnceCell<SharedTransport>,
}

impl LlmGateway {
    /// Create a gateway that binds through the given factory
    pub fn new(settings: GatewaySettings, factory: impl TransportFactory + 'static) -> Self {
        Self {
            settings,
            factory: Box::new(factory),
            client: OnceCell::new(),
        }
    }

    /// Gateway backed by the OpenAI Responses API
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            GatewaySettings {
                base_url: config.openai.base_url.clone(),
                api_key: config.openai.api_key.clone(),
                api_key_env: Some(API_KEY_VAR.to_string()),
                timeout_secs: config.openai.timeout_secs,
            },
            OpenAiTransportFactory,
        )
    }

    /// Get the bound client, constructing it on first use
    pub fn client(&self) -> Result<SharedTransport> {
        self.client
            .get_or_try_init(|| {
                let api_key = self.resolve_credential()?;
                let transport = self.factory.build(&self.settings, &api_key)?;
                info!(transport = transport.name(), base_url = %self.settings.base_url, "LLM client bound");
                Ok(transport)
            })
            .map(Arc::clone)
    }

    /// Whether a client has been bound already
    pub fn is_bound(&self) -> bool {
        self.client.get().is_some()
    }

    /// Configured key first, then the live environment (covers keys exported
    /// after the gateway was created)
    fn resolve_credential(&self) -> Result<String> {
        let configured = self.settings.api_key.trim();
        if !configured.is_empty() {
            return Ok(configured.to_string());
        }

        let variable = self.settings.api_key_env.as_deref().unwrap_or(API_KEY_VAR);
        let from_env = self
            .settings
            .api_key_env
            .as_ref()
            .and_then(|name| std::env::var(name).ok())
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty());

        match from_env {
            Some(val) => {
                debug!(variable, "Using credential from environment");
                Ok(val)
            }
            None => Err(Error::missing_credential(variable)),
        }
    }
}

impl std::fmt::Debug for LlmGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmGateway")
            .field("base_url", &self.settings.base_url)
            .field("bound", &self.is_bound())
            .finish()
    }
}
