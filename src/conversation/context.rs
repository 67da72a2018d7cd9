//! Context window strategies
//!
//! Decide which slice of the history is resent on each call. The default
//! resends everything; the sliding window bounds request size for long
//! sessions.

use std::fmt;

use super::turn::Turn;

/// Default turn cap for the sliding window
pub const DEFAULT_MAX_TURNS: usize = 40;

/// Chooses the history slice sent to the provider
pub trait ContextPolicy: Send + Sync + fmt::Debug {
    fn select<'a>(&self, history: &'a [Turn]) -> &'a [Turn];
}

/// Built-in strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextWindow {
    /// Resend the whole history, no truncation
    #[default]
    FullHistory,
    /// Keep only the most recent `max_turns` turns
    SlidingWindow { max_turns: usize },
}

impl ContextPolicy for ContextWindow {
    fn select<'a>(&self, history: &'a [Turn]) -> &'a [Turn] {
        match *self {
            ContextWindow::FullHistory => history,
            ContextWindow::SlidingWindow { max_turns } => {
                let max_turns = max_turns.max(1);
                let start = history.len().saturating_sub(max_turns);
                let window = &history[start..];

                // Open on a user turn, but never drop the only remaining turn
                match window.first() {
                    Some(first) if !first.is_user() && window.len() > 1 => &window[1..],
                    _ => window,
                }
            }
        }
    }
}

impl fmt::Display for ContextWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextWindow::FullHistory => f.write_str("full"),
            ContextWindow::SlidingWindow { max_turns } => write!(f, "sliding({})", max_turns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(pairs: usize) -> Vec<Turn> {
        let mut turns = Vec::new();
        for i in 0..pairs {
            turns.push(Turn::user(format!("q{}", i)));
            turns.push(Turn::assistant(format!("a{}", i)));
        }
        turns
    }

    #[test]
    fn test_full_history_keeps_everything() {
        let turns = history(30);
        assert_eq!(ContextWindow::FullHistory.select(&turns).len(), 60);
    }

    #[test]
    fn test_sliding_window_opens_on_user_turn() {
        let mut turns = history(5);
        turns.push(Turn::user("latest"));

        let window = ContextWindow::SlidingWindow { max_turns: 4 }.select(&turns);
        // last 4 = a3, q4, a4, latest -> leading assistant dropped
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content, "q4");
        assert_eq!(window.last().unwrap().content, "latest");
    }

    #[test]
    fn test_sliding_window_shorter_history_untouched() {
        let mut turns = history(1);
        turns.push(Turn::user("next"));
        let window = ContextWindow::SlidingWindow { max_turns: 10 }.select(&turns);
        assert_eq!(window, &turns[..]);
    }

    #[test]
    fn test_sliding_window_always_keeps_latest_user_turn() {
        let mut turns = history(3);
        turns.push(Turn::user("latest"));
        let window = ContextWindow::SlidingWindow { max_turns: 0 }.select(&turns);
        assert_eq!(window, &[Turn::user("latest")]);
    }
}
