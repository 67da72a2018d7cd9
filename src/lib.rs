//! persona-sim
//!
//! Synthesize a persona profile for a public individual from a few identity
//! hints, then hold a conversation with an LLM that answers as that persona.
//!
//! - [`llm`]: the provider boundary and its memoized client
//! - [`persona`]: research call plus redaction
//! - [`conversation`]: instruction layering and one reply per user turn
//! - [`session`]: per-session state and the single in-flight driver

pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod logging;
pub mod persona;
pub mod session;
pub mod version;

pub use error::{Error, ErrorCode, Result};
