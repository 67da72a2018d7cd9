//! Session State
//!
//! The per-session aggregate and the driver that serializes provider calls
//! against it.

mod handle;
mod state;

pub use handle::PersonaSession;
pub use state::{SessionState, FALLBACK_LABEL};
