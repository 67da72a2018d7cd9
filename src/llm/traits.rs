//! Transport trait definitions
//!
//! `LlmTransport` is the one seam between the core and the provider. Any
//! implementation that can answer a `ResponseRequest` is substitutable.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

use super::types::{ResponseOutput, ResponseRequest};

/// A bound, ready-to-use provider client
///
/// Implementations must not retry: errors go straight back to the caller.
#[async_trait]
pub trait LlmTransport: Send + Sync {
    /// Short identifier used in logs (e.g. "openai", "mock")
    fn name(&self) -> &'static str;

    /// Issue one provider call and wait for it to complete
    async fn create_response(&self, request: ResponseRequest) -> Result<ResponseOutput>;
}

/// Type alias for a shared transport reference
pub type SharedTransport = Arc<dyn LlmTransport>;

/// Settings a factory needs to bind a transport
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Provider base URL
    pub base_url: String,

    /// Credential from configuration (may be blank; the gateway checks it)
    pub api_key: String,

    /// Environment variable consulted when `api_key` is blank (None = never)
    pub api_key_env: Option<String>,

    /// HTTP timeout in seconds (0 = none)
    pub timeout_secs: u64,
}

/// Builds a transport from settings and an already-validated credential
///
/// `build` must not touch the network.
pub trait TransportFactory: Send + Sync {
    fn build(&self, settings: &GatewaySettings, api_key: &str) -> Result<SharedTransport>;
}
