//! Navigation history.
//!
//! Each entry carries a [`HistoryState`] naming the route it was pushed for.
//! Moving back or forward returns the state to replay.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub route: String,
}

impl HistoryState {
    pub fn new(route: impl Into<String>) -> Self {
        HistoryState {
            route: route.into(),
        }
    }
}

/// A linear history stack with a cursor.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryState>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry after the current one, dropping any forward entries.
    pub fn push_state(&mut self, state: HistoryState) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(state);
        self.cursor = self.entries.len() - 1;
    }

    /// Overwrites the current entry (or adds the first one).
    pub fn replace_state(&mut self, state: HistoryState) {
        match self.entries.get_mut(self.cursor) {
            Some(entry) => *entry = state,
            None => self.push_state(state),
        }
    }

    pub fn back(&mut self) -> Option<&HistoryState> {
        if self.can_go_back() {
            self.cursor -= 1;
            self.entries.get(self.cursor)
        } else {
            None
        }
    }

    pub fn forward(&mut self) -> Option<&HistoryState> {
        if self.can_go_forward() {
            self.cursor += 1;
            self.entries.get(self.cursor)
        } else {
            None
        }
    }

    pub fn current(&self) -> Option<&HistoryState> {
        self.entries.get(self.cursor)
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
