//! Conversation Orchestrator
//!
//! Layers the behavioral instruction and the persona profile ahead of the
//! turn history and asks the provider for the persona's next reply.

mod context;
mod orchestrator;
mod prompts;
mod turn;

pub use context::{ContextPolicy, ContextWindow, DEFAULT_MAX_TURNS};
pub use orchestrator::{ConversationOrchestrator, DEFAULT_CHAT_MODEL};
pub use prompts::{grounding_block, BEHAVIOR_INSTRUCTIONS, PROFILE_FOOTER, PROFILE_HEADER};
pub use turn::{Turn, TurnRole};
