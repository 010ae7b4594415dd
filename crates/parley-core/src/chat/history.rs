//! Conversation history window.
//!
//! Turns the most recent persisted turns into the role-tagged context sent to
//! the reply backend. Each turn becomes a `user` entry followed by an
//! `assistant` entry. Turn order is kept exactly as the store supplied it
//! (newest first), and the backend receives it in that order.

use parley_types::chat::{ChatTurn, ContextEntry};

/// Maximum number of turns fetched for context assembly.
pub const HISTORY_TURN_LIMIT: usize = 10;

/// Responses produced with at most this many history turns may be cached.
/// Longer conversations are likely to yield context-dependent answers.
pub const CACHEABLE_HISTORY_TURNS: usize = 4;

/// The context sequence built from recent turns.
#[derive(Debug, Clone, Default)]
pub struct HistoryWindow {
    entries: Vec<ContextEntry>,
    turn_count: usize,
}

impl HistoryWindow {
    /// Build the window from turns ordered newest first.
    ///
    /// Only the first [`HISTORY_TURN_LIMIT`] turns are used.
    pub fn from_turns(turns: &[ChatTurn]) -> Self {
        let used = &turns[..turns.len().min(HISTORY_TURN_LIMIT)];
        let entries = used
            .iter()
            .flat_map(|turn| {
                [
                    ContextEntry::user(turn.query.as_str()),
                    ContextEntry::assistant(turn.reply.as_str()),
                ]
            })
            .collect();

        Self {
            entries,
            turn_count: used.len(),
        }
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ContextEntry> {
        self.entries
    }

    /// Number of turns that contributed to the window.
    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    /// Whether a reply produced with this window may be admitted to the cache.
    pub fn is_cacheable(&self) -> bool {
        self.turn_count <= CACHEABLE_HISTORY_TURNS
    }
}
