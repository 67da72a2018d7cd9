//! Persona Synthesizer
//!
//! Researches a real person from identity hints and produces a redacted
//! persona profile for the conversation to ground on.

mod prompts;
mod redaction;
mod synthesizer;
mod types;

pub use prompts::{render_hints, research_instructions, NOT_PROVIDED};
pub use redaction::{Redacted, Redactor, DEFAULT_MARKER};
pub use synthesizer::{PersonaSynthesizer, DEFAULT_RESEARCH_MODEL};
pub use types::{IdentityHints, PersonaProfile, ProfileSection, SectionKind, SynthesizedPersona};
