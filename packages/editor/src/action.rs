//! # Editor Actions
//!
//! The closed set of operations understood by the document store.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each action is a semantic operation, not a
//!    low-level diff
//! 2. **Total**: applying an action never fails; invalid addressing is a
//!    logged no-op
//! 3. **Exhaustive**: a tagged union, so forgetting to handle a new action
//!    is a compile error
//!
//! ## History Semantics
//!
//! Content-mutating actions snapshot the pre-mutation deck for undo and
//! mark the deck dirty. Everything else (selection, editing focus, save
//! lifecycle, violations, errors) leaves history and dirty-state alone.
//! `ReplaceDeck { skip_history: true }` is the one content write that also
//! bypasses history; it exists for externally-authored content (live sync)
//! and must never look like a user edit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use deckflow_schema::{BlockPatch, Deck, DeckMetaPatch, Slide, SlidePatch, Violation};
use serde::{Deserialize, Serialize};

/// Operations accepted by [`DocumentStore::dispatch`](crate::DocumentStore::dispatch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Move the viewport to a slide. Out of range is a no-op.
    SelectSlide { index: usize },

    /// Begin inline editing of a block on the selected slide.
    StartEditing { block_id: String },

    /// End inline editing.
    StopEditing,

    /// Merge a partial update into deck metadata.
    UpdateDeckMeta { patch: DeckMetaPatch },

    /// Merge a partial update into slide-level fields.
    UpdateSlide { index: usize, patch: SlidePatch },

    /// Merge a partial update into one block, addressed by position.
    UpdateBlock {
        slide_index: usize,
        block_index: usize,
        patch: BlockPatch,
    },

    /// Insert a slide. `index: None` appends; indices clamp to the end.
    AddSlide {
        slide: Slide,
        index: Option<usize>,
    },

    /// Remove a slide. Refused when it is the last one.
    DeleteSlide { index: usize },

    /// Insert a deep copy (fresh block ids) after `index` and select it.
    DuplicateSlide { index: usize },

    /// Move a slide, preserving the relative order of all others.
    ReorderSlides { from: usize, to: usize },

    /// Replace the whole deck. With `skip_history` the write bypasses
    /// undo history and dirty tracking (live-sync path).
    ReplaceDeck {
        deck: Arc<Deck>,
        #[serde(default)]
        skip_history: bool,
    },

    /// AI transform result: swap one slide wholesale.
    AiReplaceSlide { index: usize, slide: Slide },

    /// AI transform result: replace one slide with several.
    AiSplitSlide { index: usize, slides: Vec<Slide> },

    /// Replace the content-violation side channel.
    SetViolations {
        violations: HashMap<String, Vec<Violation>>,
    },

    /// A save round trip started.
    MarkSaving,

    /// A save round trip succeeded.
    MarkSaved { at: DateTime<Utc> },

    /// Surface a collaborator error. Does not touch the deck or clear
    /// dirty-state, so a failed save stays retryable.
    SetError { message: String },
}

impl Action {
    /// Replace the deck through the ordinary, history-recording path.
    pub fn replace_deck(deck: Deck) -> Self {
        Action::ReplaceDeck {
            deck: Arc::new(deck),
            skip_history: false,
        }
    }

    /// Replace the deck through the history-bypass path (live sync).
    pub fn replace_deck_silent(deck: Arc<Deck>) -> Self {
        Action::ReplaceDeck {
            deck,
            skip_history: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckflow_schema::BlockPatch;

    #[test]
    fn test_action_serialization() {
        let action = Action::UpdateBlock {
            slide_index: 0,
            block_index: 1,
            patch: BlockPatch::text("Hello"),
        };

        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }

    #[test]
    fn test_skip_history_defaults_to_false() {
        let json = r#"{"type":"replaceDeck","deck":{"meta":{"title":"","language":"en","theme_id":"default"},"slides":[]}}"#;
        let action: Action = serde_json::from_str(json).unwrap();
        match action {
            Action::ReplaceDeck { skip_history, .. } => assert!(!skip_history),
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
