//! OpenAI Responses API transport
//!
//! Implements `LlmTransport` by posting to `{base_url}/responses` on any
//! OpenAI-compatible endpoint. One HTTP request per call, no retries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::traits::{GatewaySettings, LlmTransport, SharedTransport, TransportFactory};
use super::types::{InputMessage, ResponseOutput, ResponseRequest, Tool};

// ─────────────────────────────────────────────────────────────────
// Responses API types (request/response)
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ResponsesApiRequest<'a> {
    model: &'a str,
    reasoning: ReasoningParam<'a>,
    input: &'a [InputMessage],
    #[serde(skip_serializing_if = "<[Tool]>::is_empty")]
    tools: &'a [Tool],
}

#[derive(Debug, Serialize)]
struct ReasoningParam<'a> {
    effort: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesApiResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl ResponsesApiResponse {
    /// Aggregate text: the convenience field when present, otherwise every
    /// `output_text` part of every `message` item, in order
    fn into_text(self) -> String {
        if let Some(text) = self.output_text {
            return text;
        }

        self.output
            .into_iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("")
    }
}

// ─────────────────────────────────────────────────────────────────
// OpenAI Transport
// ─────────────────────────────────────────────────────────────────

/// OpenAI-compatible Responses API transport
pub struct OpenAiTransport {
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenAiTransport {
    /// Bind a transport; performs no network I/O
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self> {
        let mut builder = Client::builder();
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait]
impl LlmTransport for OpenAiTransport {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn create_response(&self, request: ResponseRequest) -> Result<ResponseOutput> {
        let start = Instant::now();
        let body = ResponsesApiRequest {
            model: &request.model,
            reasoning: ReasoningParam {
                effort: request.reasoning_effort.as_str(),
            },
            input: &request.input,
            tools: &request.tools,
        };

        debug!(
            model = %request.model,
            messages = request.input.len(),
            tools = request.tools.len(),
            "Sending Responses API request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .map(|env| env.error.message)
                .unwrap_or(raw);
            warn!(status = %status, "Responses API returned an error");
            return Err(Error::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let parsed: ResponsesApiResponse = serde_json::from_str(&raw).map_err(|e| {
            Error::provider_malformed(format!("Failed to parse Responses API body: {}", e))
        })?;
        let output_text = parsed.into_text();

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = output_text.len(),
            "Responses API call completed"
        );

        Ok(ResponseOutput { output_text })
    }
}

/// Factory producing `OpenAiTransport`s
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiTransportFactory;

impl TransportFactory for OpenAiTransportFactory {
    fn build(&self, settings: &GatewaySettings, api_key: &str) -> Result<SharedTransport> {
        let transport = OpenAiTransport::new(&settings.base_url, api_key, settings.timeout_secs)?;
        Ok(Arc::new(transport))
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ReasoningEffort;

    #[test]
    fn test_endpoint_trims_slash() {
        let transport = OpenAiTransport::new("https://api.example.com/v1/", "sk", 0).unwrap();
        assert_eq!(transport.endpoint(), "https://api.example.com/v1/responses");
        assert_eq!(transport.name(), "openai");
    }

    #[test]
    fn test_request_body_shape() {
        let request = ResponseRequest::new("gpt-5", ReasoningEffort::Low)
            .message(InputMessage::developer("rules"))
            .message(InputMessage::user("hello"))
            .tool(Tool::WebSearch);
        let body = ResponsesApiRequest {
            model: &request.model,
            reasoning: ReasoningParam {
                effort: request.reasoning_effort.as_str(),
            },
            input: &request.input,
            tools: &request.tools,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-5");
        assert_eq!(json["reasoning"]["effort"], "low");
        assert_eq!(json["input"][0]["role"], "developer");
        assert_eq!(json["input"][1]["content"], "hello");
        assert_eq!(json["tools"][0]["type"], "web_search");
    }

    #[test]
    fn test_request_body_omits_empty_tools() {
        let body = ResponsesApiRequest {
            model: "gpt-5",
            reasoning: ReasoningParam { effort: "low" },
            input: &[],
            tools: &[],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_text_from_output_items() {
        let raw = r#"{
            "output": [
                {"type": "web_search_call", "id": "ws_1", "status": "completed"},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "Hello, "},
                    {"type": "output_text", "text": "world"}
                ]}
            ]
        }"#;
        let parsed: ResponsesApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text(), "Hello, world");
    }

    #[test]
    fn test_text_prefers_convenience_field() {
        let raw = r#"{"output_text": "direct", "output": []}"#;
        let parsed: ResponsesApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text(), "direct");
    }

    #[test]
    fn test_empty_body_yields_empty_text() {
        let parsed: ResponsesApiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.into_text(), "");
    }
}
