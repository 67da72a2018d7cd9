//! Mock transport for testing
//!
//! Scripted replies, injected failures, request capture and a construction
//! counter for the factory. Used by unit and integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};

use super::traits::{GatewaySettings, LlmTransport, SharedTransport, TransportFactory};
use super::types::{ResponseOutput, ResponseRequest};

// ─────────────────────────────────────────────────────────────────
// Scripted Replies
// ─────────────────────────────────────────────────────────────────

/// What the mock answers with for one call
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text
    Text(String),
    /// Return the content of the last input message verbatim
    Echo,
    /// Fail with a provider status error carrying this body
    Fail(String),
}

/// Shared counter readable after the mock has been moved into a gateway
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

// ─────────────────────────────────────────────────────────────────
// Mock Transport
// ─────────────────────────────────────────────────────────────────

/// Mock implementation of `LlmTransport`
pub struct MockTransport {
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    fail_on_call: Option<usize>,
    delay: Option<Duration>,
    requests: Mutex<Vec<ResponseRequest>>,
    calls: CallCounter,
}

impl MockTransport {
    fn with_fallback(fallback: MockReply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            fail_on_call: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
            calls: CallCounter::default(),
        }
    }

    /// Always answer with the same text
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::with_fallback(MockReply::Text(text.into()))
    }

    /// Echo the last input message back
    pub fn echo() -> Self {
        Self::with_fallback(MockReply::Echo)
    }

    /// Answer with each reply in order, then fall back to an empty body
    pub fn scripted(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let mock = Self::with_fallback(MockReply::Text(String::new()));
        mock.script.lock().extend(replies);
        mock
    }

    /// Fail the given call (1-based) regardless of the script
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Sleep before answering every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `create_response` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    /// Every request received, oldest first
    pub fn requests(&self) -> Vec<ResponseRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<ResponseRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl LlmTransport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_response(&self, request: ResponseRequest) -> Result<ResponseOutput> {
        let call = self.calls.bump();
        self.requests.lock().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_on_call == Some(call) {
            return Err(Error::ProviderStatus {
                status: 500,
                body: format!("mock failure on call {}", call),
            });
        }

        let reply = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Text(text) => Ok(ResponseOutput::text(text)),
            MockReply::Echo => Ok(ResponseOutput::text(
                request
                    .input
                    .last()
                    .map(|m| m.content.clone())
                    .unwrap_or_default(),
            )),
            MockReply::Fail(body) => Err(Error::ProviderStatus { status: 500, body }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Mock Factory
// ─────────────────────────────────────────────────────────────────

/// Factory handing out one shared `MockTransport` and counting constructions
pub struct MockTransportFactory {
    transport: Arc<MockTransport>,
    builds: CallCounter,
    fail_first: usize,
    last_api_key: Arc<Mutex<Option<String>>>,
}

impl MockTransportFactory {
    pub fn new(transport: MockTransport) -> Self {
        Self::shared(Arc::new(transport))
    }

    /// Wrap a transport the test keeps a handle to
    pub fn shared(transport: Arc<MockTransport>) -> Self {
        Self {
            transport,
            builds: CallCounter::default(),
            fail_first: 0,
            last_api_key: Arc::new(Mutex::new(None)),
        }
    }

    /// Make the first `n` constructions fail
    pub fn failing_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    /// Counter of `build` invocations (including failed ones)
    pub fn build_counter(&self) -> CallCounter {
        self.builds.clone()
    }

    /// The credential passed to the most recent `build`
    pub fn last_api_key(&self) -> Arc<Mutex<Option<String>>> {
        Arc::clone(&self.last_api_key)
    }
}

impl TransportFactory for MockTransportFactory {
    fn build(&self, _settings: &GatewaySettings, api_key: &str) -> Result<SharedTransport> {
        let n = self.builds.bump();
        *self.last_api_key.lock() = Some(api_key.to_string());

        if n <= self.fail_first {
            return Err(Error::Internal(format!("mock construction {} failed", n)));
        }

        let transport: SharedTransport = self.transport.clone();
        Ok(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{InputMessage, ReasoningEffort};

    fn request(text: &str) -> ResponseRequest {
        ResponseRequest::new("m", ReasoningEffort::Low).message(InputMessage::user(text))
    }

    #[tokio::test]
    async fn test_scripted_then_empty() {
        let mock = MockTransport::scripted(vec![
            MockReply::Text("one".into()),
            MockReply::Fail("boom".into()),
        ]);

        assert_eq!(mock.create_response(request("a")).await.unwrap().output_text, "one");
        assert!(mock.create_response(request("b")).await.is_err());
        assert_eq!(mock.create_response(request("c")).await.unwrap().output_text, "");
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_echo_returns_last_message() {
        let mock = MockTransport::echo();
        let out = mock.create_response(request("repeat me")).await.unwrap();
        assert_eq!(out.output_text, "repeat me");
    }

    #[tokio::test]
    async fn test_failing_on_call() {
        let mock = MockTransport::fixed("ok").failing_on_call(2);
        assert!(mock.create_response(request("a")).await.is_ok());
        assert!(mock.create_response(request("b")).await.is_err());
        assert!(mock.create_response(request("c")).await.is_ok());
    }
}
