//! Session state
//!
//! In-memory aggregate of the active persona and its conversation history.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::conversation::Turn;
use crate::error::{Error, Result};
use crate::persona::PersonaProfile;

/// Label shown when no display name is available
pub const FALLBACK_LABEL: &str = "Persona";

// ─────────────────────────────────────────────────────────────────
// Session State
// ─────────────────────────────────────────────────────────────────

/// One profile, one display name, one ordered turn history.
///
/// History is only ever non-empty while a profile is set, and installing a
/// new profile always starts from an empty history.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    created_at: DateTime<Utc>,
    profile: Option<PersonaProfile>,
    display_name: String,
    turns: Vec<Turn>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            profile: None,
            display_name: String::new(),
            turns: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Drop the persona and the history
    pub fn reset(&mut self) {
        self.profile = None;
        self.display_name.clear();
        self.turns.clear();
        debug!(session = %self.id, "Session reset");
    }

    /// Install a new persona, replacing the old one and clearing the history
    pub fn set_persona(&mut self, profile: PersonaProfile, display_name: impl Into<String>) {
        let dropped = self.turns.len();
        self.profile = Some(profile);
        self.display_name = display_name.into();
        self.turns.clear();
        debug!(session = %self.id, dropped_turns = dropped, "Persona installed");
    }

    /// Append a turn. Rejected while no persona is set.
    pub fn append_turn(&mut self, turn: Turn) -> Result<()> {
        if self.profile.is_none() {
            return Err(Error::NoPersona);
        }
        self.turns.push(turn);
        Ok(())
    }

    /// Clear the history but keep the persona
    pub fn clear_history(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn profile(&self) -> Option<&PersonaProfile> {
        self.profile.as_ref()
    }

    pub fn has_persona(&self) -> bool {
        self.profile.is_some()
    }

    /// Raw display name; empty when synthesis had no full name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Display name for rendering, falling back to a generic label
    pub fn display_label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            FALLBACK_LABEL
        } else {
            &self.display_name
        }
    }
}
