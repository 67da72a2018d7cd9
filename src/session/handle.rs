//! Session driver
//!
//! Wraps a `SessionState` together with the synthesizer and orchestrator and
//! enforces at most one provider call in flight per session. Chat turns can
//! be cancelled through a oneshot signal; a cancelled turn leaves the state
//! exactly as a failed one would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::conversation::{ConversationOrchestrator, Turn};
use crate::error::{Error, Result};
use crate::llm::LlmGateway;
use crate::persona::{IdentityHints, PersonaProfile, PersonaSynthesizer, SynthesizedPersona};

use super::state::SessionState;

/// Clears the in-flight flag when the call finishes, fails or is dropped
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A persona conversation session
pub struct PersonaSession {
    state: Mutex<SessionState>,
    synthesizer: PersonaSynthesizer,
    orchestrator: ConversationOrchestrator,
    in_flight: AtomicBool,
}

impl PersonaSession {
    pub fn new(synthesizer: PersonaSynthesizer, orchestrator: ConversationOrchestrator) -> Self {
        Self {
            state: Mutex::new(SessionState::new()),
            synthesizer,
            orchestrator,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Session over the OpenAI gateway described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let gateway = Arc::new(LlmGateway::from_config(config));
        Ok(Self::new(
            PersonaSynthesizer::from_config(Arc::clone(&gateway), config)?,
            ConversationOrchestrator::from_config(gateway, config)?,
        ))
    }

    pub fn id(&self) -> Uuid {
        self.state.lock().id()
    }

    /// Whether a provider call is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| Error::SessionBusy)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    // ─────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────

    /// Synthesize a persona and install it, clearing the history.
    ///
    /// On failure the previous persona and history stay as they were.
    pub async fn create_persona(&self, hints: &IdentityHints) -> Result<SynthesizedPersona> {
        let _guard = self.begin()?;
        let persona = self.synthesizer.synthesize(hints).await?;

        let mut state = self.state.lock();
        state.set_persona(persona.profile.clone(), persona.display_name.clone());
        info!(session = %state.id(), empty = persona.profile.is_empty(), "New persona active");
        Ok(persona)
    }

    /// Send a user turn and wait for the persona's reply
    pub async fn chat(&self, text: impl Into<String>) -> Result<String> {
        self.run_turn(text.into(), None).await
    }

    /// Like `chat`, but gives up with `Cancelled` once `cancel` fires
    pub async fn chat_cancellable(
        &self,
        text: impl Into<String>,
        cancel: oneshot::Receiver<()>,
    ) -> Result<String> {
        self.run_turn(text.into(), Some(cancel)).await
    }

    async fn run_turn(&self, text: String, cancel: Option<oneshot::Receiver<()>>) -> Result<String> {
        let _guard = self.begin()?;

        // Record the user turn first; it stays even if the call fails
        let (history, profile) = {
            let mut state = self.state.lock();
            let profile = state.profile().cloned().ok_or(Error::NoPersona)?;
            state.append_turn(Turn::user(text))?;
            (state.turns().to_vec(), profile)
        };

        let reply = match cancel {
            None => self.orchestrator.respond(&history, &profile).await?,
            Some(cancel) => {
                tokio::select! {
                    result = self.orchestrator.respond(&history, &profile) => result?,
                    Ok(()) = cancel => {
                        warn!(turns = history.len(), "Chat turn cancelled");
                        return Err(Error::Cancelled);
                    }
                }
            }
        };

        self.state.lock().append_turn(Turn::assistant(reply.clone()))?;
        Ok(reply)
    }

    /// Drop persona and history
    pub fn reset(&self) -> Result<()> {
        let _guard = self.begin()?;
        self.state.lock().reset();
        Ok(())
    }

    /// Keep the persona, forget the conversation
    pub fn clear_history(&self) -> Result<()> {
        let _guard = self.begin()?;
        self.state.lock().clear_history();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    // Accessors (copies; no lock escapes)
    // ─────────────────────────────────────────────────────────────

    pub fn turns(&self) -> Vec<Turn> {
        self.state.lock().turns().to_vec()
    }

    pub fn profile(&self) -> Option<PersonaProfile> {
        self.state.lock().profile().cloned()
    }

    pub fn display_label(&self) -> String {
        self.state.lock().display_label().to_string()
    }
}

impl std::fmt::Debug for PersonaSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PersonaSession")
            .field("id", &state.id())
            .field("created_at", &state.created_at())
            .field("has_persona", &state.has_persona())
            .field("turns", &state.turns().len())
            .field("busy", &self.is_busy())
            .finish()
    }
}
