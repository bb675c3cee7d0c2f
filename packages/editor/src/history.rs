//! # Undo/Redo History
//!
//! Bounded stacks of deck snapshots.
//!
//! ## Design
//!
//! - Every content mutation records the pre-mutation snapshot
//! - Undo pops `past`, pushes the current deck onto `future`
//! - Redo is the symmetric inverse
//! - New mutations clear `future` (an edit from a rewound state discards
//!   the old redo branch)
//! - Both stacks are capped; the oldest entry is evicted first
//!
//! Snapshots are `Arc<Deck>`, so keeping fifty of them costs fifty pointers
//! plus whatever the copy-on-write mutations actually cloned.

use std::collections::VecDeque;
use std::sync::Arc;

use deckflow_schema::Deck;

/// Default number of undo levels retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Bounded undo/redo stacks of deck snapshots.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Arc<Deck>>,
    future: VecDeque<Arc<Deck>>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            capacity,
        }
    }

    /// Record the pre-mutation snapshot. Clears the redo branch.
    pub fn record(&mut self, before: Arc<Deck>) {
        if self.capacity > 0 && self.past.len() == self.capacity {
            self.past.pop_front();
        }
        self.past.push_back(before);
        self.future.clear();
    }

    /// Pop the most recent snapshot, parking `current` on the redo stack.
    /// Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Arc<Deck>) -> Option<Arc<Deck>> {
        let snapshot = self.past.pop_back()?;
        if self.capacity > 0 && self.future.len() == self.capacity {
            self.future.pop_front();
        }
        self.future.push_back(current);
        Some(snapshot)
    }

    /// Inverse of [`undo`](Self::undo). Returns `None` when there is
    /// nothing to redo.
    pub fn redo(&mut self, current: Arc<Deck>) -> Option<Arc<Deck>> {
        let snapshot = self.future.pop_back()?;
        if self.capacity > 0 && self.past.len() == self.capacity {
            self.past.pop_front();
        }
        self.past.push_back(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
