//! # Document Store
//!
//! Single owner of editor state. All changes funnel through
//! [`DocumentStore::dispatch`], which applies one [`Action`] at a time as a
//! total function: invalid addressing and invariant violations are logged
//! no-ops, never panics and never errors.
//!
//! ## Snapshot model
//!
//! The deck is held as `Arc<Deck>` and replaced wholesale on every content
//! mutation (clone, mutate the clone, swap the pointer). The pre-mutation
//! `Arc` becomes the undo snapshot, so history costs one pointer per entry.
//!
//! ## Invariants
//!
//! - `selected_slide` always addresses a real slide (0 for an empty deck)
//! - `editing_block`, when set, addresses a block on the selected slide
//! - a deck never drops below one slide through `DeleteSlide`
//! - `ReplaceDeck { skip_history: true }` touches neither history nor
//!   dirty-state

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use deckflow_schema::{Deck, Violation};
use tracing::{debug, warn};

use crate::action::Action;
use crate::history::History;

/// Full state of one editing session, as observed by the UI layer.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub deck: Arc<Deck>,
    pub selected_slide: usize,
    pub editing_block: Option<String>,
    pub history: History,
    pub is_dirty: bool,
    pub is_saving: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub violations: HashMap<String, Vec<Violation>>,
}

/// Reducer-driven store owning the deck and its history.
#[derive(Debug)]
pub struct DocumentStore {
    state: EditorState,
}

impl DocumentStore {
    pub fn new(deck: Deck) -> Self {
        Self::with_history(deck, History::new())
    }

    pub fn with_history(deck: Deck, history: History) -> Self {
        Self {
            state: EditorState {
                deck: Arc::new(deck),
                selected_slide: 0,
                editing_block: None,
                history,
                is_dirty: false,
                is_saving: false,
                last_saved_at: None,
                error: None,
                violations: HashMap::new(),
            },
        }
    }

    /// Read-only snapshot of the current state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn deck(&self) -> &Arc<Deck> {
        &self.state.deck
    }

    pub fn can_undo(&self) -> bool {
        self.state.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.history.can_redo()
    }

    /// Apply one action. Total: invalid actions log and leave state
    /// unchanged.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SelectSlide { index } => self.select_slide(index),
            Action::StartEditing { block_id } => self.start_editing(block_id),
            Action::StopEditing => self.state.editing_block = None,

            Action::UpdateDeckMeta { patch } => {
                let mut next = Deck::clone(&self.state.deck);
                next.meta.merge(&patch);
                self.commit(next);
            }

            Action::UpdateSlide { index, patch } => {
                if self.slide_out_of_range(index, "updateSlide") {
                    return;
                }
                let mut next = Deck::clone(&self.state.deck);
                next.slides[index].merge(&patch);
                self.commit(next);
            }

            Action::UpdateBlock {
                slide_index,
                block_index,
                patch,
            } => {
                if self.slide_out_of_range(slide_index, "updateBlock") {
                    return;
                }
                if block_index >= self.state.deck.slides[slide_index].blocks.len() {
                    warn!(
                        slide_index,
                        block_index, "updateBlock: block index out of range, ignoring"
                    );
                    return;
                }
                let mut next = Deck::clone(&self.state.deck);
                next.slides[slide_index].blocks[block_index].body.merge(&patch);
                self.commit(next);
            }

            Action::AddSlide { slide, index } => {
                let mut next = Deck::clone(&self.state.deck);
                let at = index.unwrap_or(next.slides.len()).min(next.slides.len());
                next.slides.insert(at, slide);
                self.commit(next);
                self.state.selected_slide = at;
                self.state.editing_block = None;
            }

            Action::DeleteSlide { index } => {
                if self.slide_out_of_range(index, "deleteSlide") {
                    return;
                }
                if self.state.deck.slides.len() == 1 {
                    warn!("deleteSlide: refusing to remove the last slide");
                    return;
                }
                let mut next = Deck::clone(&self.state.deck);
                next.slides.remove(index);
                self.commit(next);
                if self.state.selected_slide > index {
                    self.state.selected_slide -= 1;
                }
                self.clamp_selection();
                self.refresh_editing();
            }

            Action::DuplicateSlide { index } => {
                if self.slide_out_of_range(index, "duplicateSlide") {
                    return;
                }
                let mut next = Deck::clone(&self.state.deck);
                let copy = next.slides[index].duplicated();
                next.slides.insert(index + 1, copy);
                self.commit(next);
                self.state.selected_slide = index + 1;
                self.state.editing_block = None;
            }

            Action::ReorderSlides { from, to } => {
                if from == to {
                    return;
                }
                let len = self.state.deck.slides.len();
                if from >= len || to >= len {
                    warn!(from, to, len, "reorderSlides: index out of range, ignoring");
                    return;
                }
                let mut next = Deck::clone(&self.state.deck);
                let slide = next.slides.remove(from);
                next.slides.insert(to, slide);
                self.commit(next);

                // Selection follows the slide it was on.
                let selected = self.state.selected_slide;
                self.state.selected_slide = if selected == from {
                    to
                } else if from < selected && to >= selected {
                    selected - 1
                } else if from > selected && to <= selected {
                    selected + 1
                } else {
                    selected
                };
            }

            Action::ReplaceDeck { deck, skip_history } => {
                if skip_history {
                    debug!(
                        slides = deck.slides.len(),
                        "replaceDeck: history-bypass install"
                    );
                    self.state.deck = deck;
                } else {
                    let before = std::mem::replace(&mut self.state.deck, deck);
                    self.state.history.record(before);
                    self.state.is_dirty = true;
                }
                self.clamp_selection();
                self.refresh_editing();
            }

            Action::AiReplaceSlide { index, slide } => {
                if self.slide_out_of_range(index, "aiReplaceSlide") {
                    return;
                }
                let mut next = Deck::clone(&self.state.deck);
                next.slides[index] = slide;
                self.commit(next);
                self.refresh_editing();
            }

            Action::AiSplitSlide { index, slides } => {
                if self.slide_out_of_range(index, "aiSplitSlide") {
                    return;
                }
                if slides.is_empty() {
                    warn!(index, "aiSplitSlide: empty replacement, ignoring");
                    return;
                }
                let mut next = Deck::clone(&self.state.deck);
                next.slides.splice(index..=index, slides);
                self.commit(next);
                self.refresh_editing();
            }

            Action::SetViolations { violations } => {
                self.state.violations = violations;
            }

            Action::MarkSaving => {
                self.state.is_saving = true;
            }

            Action::MarkSaved { at } => {
                self.state.is_saving = false;
                self.state.is_dirty = false;
                self.state.last_saved_at = Some(at);
                self.state.error = None;
            }

            Action::SetError { message } => {
                // Dirty-state is deliberately untouched: a failed save
                // stays retryable.
                self.state.is_saving = false;
                self.state.error = Some(message);
            }
        }
    }

    /// Rewind to the previous snapshot. Returns `false` when history is
    /// empty.
    pub fn undo(&mut self) -> bool {
        let current = Arc::clone(&self.state.deck);
        match self.state.history.undo(current) {
            Some(snapshot) => {
                self.state.deck = snapshot;
                self.state.is_dirty = true;
                self.clamp_selection();
                self.refresh_editing();
                true
            }
            None => false,
        }
    }

    /// Inverse of [`undo`](Self::undo). Returns `false` when the redo
    /// branch is empty.
    pub fn redo(&mut self) -> bool {
        let current = Arc::clone(&self.state.deck);
        match self.state.history.redo(current) {
            Some(snapshot) => {
                self.state.deck = snapshot;
                self.state.is_dirty = true;
                self.clamp_selection();
                self.refresh_editing();
                true
            }
            None => false,
        }
    }

    fn select_slide(&mut self, index: usize) {
        if index >= self.state.deck.slides.len() {
            warn!(
                index,
                len = self.state.deck.slides.len(),
                "selectSlide: index out of range, ignoring"
            );
            return;
        }
        if self.state.selected_slide != index {
            self.state.selected_slide = index;
            self.state.editing_block = None;
        }
    }

    fn start_editing(&mut self, block_id: String) {
        let on_selected = self
            .state
            .deck
            .slides
            .get(self.state.selected_slide)
            .map_or(false, |slide| slide.block_by_id(&block_id).is_some());
        if on_selected {
            self.state.editing_block = Some(block_id);
        } else {
            warn!(%block_id, "startEditing: block not on the selected slide, ignoring");
        }
    }

    /// Install a mutated deck clone: record the pre-mutation snapshot and
    /// mark dirty.
    fn commit(&mut self, next: Deck) {
        let before = std::mem::replace(&mut self.state.deck, Arc::new(next));
        self.state.history.record(before);
        self.state.is_dirty = true;
    }

    fn slide_out_of_range(&self, index: usize, op: &str) -> bool {
        if index >= self.state.deck.slides.len() {
            warn!(
                index,
                len = self.state.deck.slides.len(),
                "{}: slide index out of range, ignoring",
                op
            );
            true
        } else {
            false
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.state.deck.slides.len();
        if len == 0 {
            self.state.selected_slide = 0;
        } else if self.state.selected_slide >= len {
            self.state.selected_slide = len - 1;
        }
    }

    fn refresh_editing(&mut self) {
        if let Some(id) = &self.state.editing_block {
            let still_there = self
                .state
                .deck
                .slides
                .get(self.state.selected_slide)
                .map_or(false, |slide| slide.block_by_id(id).is_some());
            if !still_there {
                self.state.editing_block = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckflow_schema::{Block, BlockBody, BlockPatch, Slide};

    fn slide(kind: &str, title: &str) -> Slide {
        Slide::with_blocks(
            kind,
            vec![Block::new(BlockBody::Title {
                text: title.to_string(),
            })],
        )
    }

    fn three_slide_store() -> DocumentStore {
        let deck = Deck::new(
            Default::default(),
            vec![slide("title", "A"), slide("content", "B"), slide("content", "C")],
        );
        DocumentStore::new(deck)
    }

    fn titles(store: &DocumentStore) -> Vec<&str> {
        store
            .deck()
            .slides
            .iter()
            .map(|s| s.title_text().unwrap())
            .collect()
    }

    #[test]
    fn test_update_block_then_undo_then_redo() {
        let mut store = three_slide_store();

        store.dispatch(Action::UpdateBlock {
            slide_index: 0,
            block_index: 0,
            patch: BlockPatch::text("A2"),
        });

        assert_eq!(store.deck().slides[0].title_text(), Some("A2"));
        assert!(store.state().is_dirty);
        assert_eq!(store.state().history.past_len(), 1);

        assert!(store.undo());
        assert_eq!(store.deck().slides[0].title_text(), Some("A"));
        assert_eq!(store.state().history.future_len(), 1);

        assert!(store.redo());
        assert_eq!(store.deck().slides[0].title_text(), Some("A2"));
    }

    #[test]
    fn test_update_block_out_of_range_is_noop() {
        let mut store = three_slide_store();
        let before = Arc::clone(store.deck());

        store.dispatch(Action::UpdateBlock {
            slide_index: 9,
            block_index: 0,
            patch: BlockPatch::text("x"),
        });
        store.dispatch(Action::UpdateBlock {
            slide_index: 0,
            block_index: 9,
            patch: BlockPatch::text("x"),
        });

        assert!(Arc::ptr_eq(store.deck(), &before));
        assert!(!store.state().is_dirty);
        assert_eq!(store.state().history.past_len(), 0);
    }

    #[test]
    fn test_delete_last_slide_is_refused() {
        let mut store = DocumentStore::new(Deck::new_template("solo"));
        store.dispatch(Action::DeleteSlide { index: 0 });
        assert_eq!(store.deck().slides.len(), 1);
        assert!(!store.state().is_dirty);
    }

    #[test]
    fn test_delete_slide_adjusts_selection() {
        let mut store = three_slide_store();
        store.dispatch(Action::SelectSlide { index: 2 });
        store.dispatch(Action::DeleteSlide { index: 2 });
        assert_eq!(store.state().selected_slide, 1);

        store.dispatch(Action::DeleteSlide { index: 0 });
        assert_eq!(store.state().selected_slide, 0);
        assert_eq!(titles(&store), vec!["B"]);
    }

    #[test]
    fn test_duplicate_slide_inserts_copy_and_selects_it() {
        let mut store = three_slide_store();
        store.dispatch(Action::DuplicateSlide { index: 0 });

        assert_eq!(store.deck().slides.len(), 4);
        assert_eq!(store.state().selected_slide, 1);
        assert_eq!(
            store.deck().slides[1].title_text(),
            store.deck().slides[0].title_text()
        );
        // Deep copy, fresh ids.
        assert_ne!(
            store.deck().slides[1].blocks[0].id,
            store.deck().slides[0].blocks[0].id
        );
    }

    #[test]
    fn test_reorder_slides() {
        let mut store = three_slide_store();
        store.dispatch(Action::ReorderSlides { from: 0, to: 2 });
        assert_eq!(titles(&store), vec!["B", "C", "A"]);

        // Selection followed slide A from 0 to 2.
        assert_eq!(store.state().selected_slide, 2);
    }

    #[test]
    fn test_reorder_same_index_records_nothing() {
        let mut store = three_slide_store();
        store.dispatch(Action::ReorderSlides { from: 1, to: 1 });
        assert_eq!(store.state().history.past_len(), 0);
        assert!(!store.state().is_dirty);
    }

    #[test]
    fn test_replace_deck_with_skip_history_bypasses_everything() {
        let mut store = three_slide_store();
        let remote = Arc::new(Deck::new_template("remote"));

        store.dispatch(Action::replace_deck_silent(Arc::clone(&remote)));

        assert!(Arc::ptr_eq(store.deck(), &remote));
        assert_eq!(store.state().history.past_len(), 0);
        assert_eq!(store.state().history.future_len(), 0);
        assert!(!store.state().is_dirty);
        // Selection clamped onto the smaller deck.
        assert_eq!(store.state().selected_slide, 0);
    }

    #[test]
    fn test_replace_deck_without_skip_records_history() {
        let mut store = three_slide_store();
        store.dispatch(Action::replace_deck(Deck::new_template("repair")));
        assert_eq!(store.state().history.past_len(), 1);
        assert!(store.state().is_dirty);
    }

    #[test]
    fn test_mutation_after_undo_clears_redo() {
        let mut store = three_slide_store();
        store.dispatch(Action::DuplicateSlide { index: 0 });
        assert!(store.undo());
        assert!(store.can_redo());

        store.dispatch(Action::UpdateBlock {
            slide_index: 0,
            block_index: 0,
            patch: BlockPatch::text("fresh edit"),
        });
        assert!(!store.can_redo());
    }

    #[test]
    fn test_n_mutations_then_n_undos_round_trip() {
        let mut store = three_slide_store();
        let original = Arc::clone(store.deck());

        for i in 0..5 {
            store.dispatch(Action::UpdateBlock {
                slide_index: 0,
                block_index: 0,
                patch: BlockPatch::text(format!("rev {i}")),
            });
        }
        for _ in 0..5 {
            assert!(store.undo());
        }

        assert!(Arc::ptr_eq(store.deck(), &original));
    }

    #[test]
    fn test_start_editing_requires_block_on_selected_slide() {
        let mut store = three_slide_store();
        let other_slide_block = store.deck().slides[1].blocks[0].id.clone();
        store.dispatch(Action::StartEditing {
            block_id: other_slide_block,
        });
        assert!(store.state().editing_block.is_none());

        let own_block = store.deck().slides[0].blocks[0].id.clone();
        store.dispatch(Action::StartEditing {
            block_id: own_block.clone(),
        });
        assert_eq!(store.state().editing_block.as_deref(), Some(own_block.as_str()));

        // Changing slides drops editing focus.
        store.dispatch(Action::SelectSlide { index: 1 });
        assert!(store.state().editing_block.is_none());
    }

    #[test]
    fn test_ai_split_slide() {
        let mut store = three_slide_store();
        store.dispatch(Action::AiSplitSlide {
            index: 1,
            slides: vec![slide("content", "B1"), slide("content", "B2")],
        });
        assert_eq!(titles(&store), vec!["A", "B1", "B2", "C"]);

        store.dispatch(Action::AiSplitSlide {
            index: 0,
            slides: vec![],
        });
        assert_eq!(store.deck().slides.len(), 4);
    }

    #[test]
    fn test_save_lifecycle() {
        let mut store = three_slide_store();
        store.dispatch(Action::DuplicateSlide { index: 0 });
        assert!(store.state().is_dirty);

        store.dispatch(Action::MarkSaving);
        assert!(store.state().is_saving);

        let at = Utc::now();
        store.dispatch(Action::MarkSaved { at });
        assert!(!store.state().is_saving);
        assert!(!store.state().is_dirty);
        assert_eq!(store.state().last_saved_at, Some(at));
    }

    #[test]
    fn test_save_failure_keeps_dirty() {
        let mut store = three_slide_store();
        store.dispatch(Action::DuplicateSlide { index: 0 });
        store.dispatch(Action::MarkSaving);
        store.dispatch(Action::SetError {
            message: "backend unavailable".to_string(),
        });

        assert!(!store.state().is_saving);
        assert!(store.state().is_dirty);
        assert_eq!(store.state().error.as_deref(), Some("backend unavailable"));
    }
}
