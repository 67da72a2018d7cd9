//! LLM Gateway
//!
//! The single provider boundary the rest of the crate depends on: request
//! types, the `LlmTransport` seam, the memoizing `LlmGateway`, and the
//! OpenAI and mock transports.

mod gateway;
pub mod mock;
mod openai;
mod traits;
mod types;

pub use gateway::LlmGateway;
pub use openai::{OpenAiTransport, OpenAiTransportFactory};
pub use traits::*;
pub use types::*;
