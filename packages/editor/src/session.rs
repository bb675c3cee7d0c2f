//! # Editor Session
//!
//! Glues the store, live-sync reconciler and command registry into one
//! object with a single synchronous dispatch path. Async collaborators
//! (save, AI transforms) run outside; their completions re-enter here in
//! FIFO dispatch order, so the engine never sees two mutations at once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use deckflow_schema::{Deck, Slide};

use crate::action::Action;
use crate::collab::TransformOutcome;
use crate::command::{CommandContext, CommandRegistry, UiEvent};
use crate::errors::TransformError;
use crate::history::{History, DEFAULT_HISTORY_CAPACITY};
use crate::keyboard::{KeyInput, Platform};
use crate::reconcile::{LiveSyncReconciler, LiveUpdate};
use crate::store::{DocumentStore, EditorState};

/// Session construction options.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Whether a generation stream is still producing slides.
    pub live: bool,
    pub platform: Platform,
    pub history_capacity: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            live: false,
            platform: Platform::current(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Cancellation flag for one in-flight transform.
///
/// Cancelling does not abort the underlying request; the eventual result
/// is checked against the flag immediately before application and
/// discarded if cancelled.
#[derive(Debug, Clone, Default)]
pub struct TransformHandle {
    cancelled: Arc<AtomicBool>,
}

impl TransformHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One local editing session: a store plus its reconciler, commands and
/// keyboard routing.
pub struct EditorSession {
    store: DocumentStore,
    live_sync: LiveSyncReconciler,
    registry: CommandRegistry,
    platform: Platform,
    events: Vec<UiEvent>,
}

impl EditorSession {
    pub fn new(deck: Deck, options: SessionOptions) -> Self {
        let mut registry = CommandRegistry::new();
        registry.register_builtins();
        Self {
            store: DocumentStore::with_history(
                deck,
                History::with_capacity(options.history_capacity),
            ),
            live_sync: LiveSyncReconciler::new(options.live),
            registry,
            platform: options.platform,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &EditorState {
        self.store.state()
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn is_live(&self) -> bool {
        self.live_sync.is_live()
    }

    /// Dispatch one action through the store, latching the reconciler's
    /// interaction flag when the deck comes out dirty.
    pub fn dispatch(&mut self, action: Action) {
        self.store.dispatch(action);
        if self.store.state().is_dirty {
            self.live_sync.note_user_edit();
        }
    }

    pub fn undo(&mut self) -> bool {
        let did = self.store.undo();
        if did {
            self.live_sync.note_user_edit();
        }
        did
    }

    pub fn redo(&mut self) -> bool {
        let did = self.store.redo();
        if did {
            self.live_sync.note_user_edit();
        }
        did
    }

    /// Route a key press. Returns `true` when a command consumed it and
    /// the caller should suppress default handling.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        let Some(command) = self.registry.match_key(self.platform, input) else {
            return false;
        };
        {
            let mut ctx = CommandContext {
                store: &mut self.store,
                events: &mut self.events,
            };
            command.run(&mut ctx);
        }
        self.latch_interaction();
        true
    }

    /// Run a command by id (palette selection). Returns `false` for an
    /// unknown id.
    pub fn run_command(&mut self, id: &str) -> bool {
        let Some(command) = self.registry.get(id) else {
            return false;
        };
        {
            let mut ctx = CommandContext {
                store: &mut self.store,
                events: &mut self.events,
            };
            command.run(&mut ctx);
        }
        self.latch_interaction();
        true
    }

    /// Take the UI events accumulated by command runs.
    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feed one live-stream delivery through the reconciler.
    pub fn sync(&mut self, update: LiveUpdate) {
        self.live_sync.apply(&mut self.store, update);
    }

    pub fn sync_deck(&mut self, remote: Arc<Deck>) {
        self.live_sync.sync_deck(&mut self.store, remote);
    }

    pub fn sync_image(&mut self, slide_index: usize, url: &str) {
        self.live_sync.sync_image(&mut self.store, slide_index, url);
    }

    /// Generation framing ended; local edits win from here on.
    pub fn finish_live(&mut self) {
        self.live_sync.finish();
    }

    // --- save lifecycle -------------------------------------------------

    /// Mark a save round trip as started and hand back the snapshot the
    /// caller should persist.
    pub fn begin_save(&mut self) -> Arc<Deck> {
        self.dispatch(Action::MarkSaving);
        Arc::clone(self.store.deck())
    }

    pub fn complete_save(&mut self, at: DateTime<Utc>) {
        self.dispatch(Action::MarkSaved { at });
    }

    pub fn fail_save(&mut self, error: impl std::fmt::Display) {
        self.dispatch(Action::SetError {
            message: error.to_string(),
        });
    }

    // --- AI transform lifecycle -----------------------------------------

    /// Start tracking one in-flight transform.
    pub fn begin_transform(&mut self) -> TransformHandle {
        TransformHandle::new()
    }

    /// Apply a completed transform, unless its handle was cancelled in the
    /// meantime or the slide vanished.
    pub fn apply_transform(
        &mut self,
        handle: &TransformHandle,
        slide_index: usize,
        outcome: TransformOutcome,
    ) -> Result<(), TransformError> {
        if handle.is_cancelled() {
            return Err(TransformError::Cancelled);
        }
        if slide_index >= self.store.deck().slides.len() {
            return Err(TransformError::SlideOutOfRange(slide_index));
        }
        self.dispatch(Action::AiReplaceSlide {
            index: slide_index,
            slide: outcome.slide,
        });
        Ok(())
    }

    /// Apply a completed split transform, with the same cancellation
    /// check.
    pub fn apply_split(
        &mut self,
        handle: &TransformHandle,
        slide_index: usize,
        slides: Vec<Slide>,
    ) -> Result<(), TransformError> {
        if handle.is_cancelled() {
            return Err(TransformError::Cancelled);
        }
        if slide_index >= self.store.deck().slides.len() {
            return Err(TransformError::SlideOutOfRange(slide_index));
        }
        self.dispatch(Action::AiSplitSlide {
            index: slide_index,
            slides,
        });
        Ok(())
    }

    fn latch_interaction(&mut self) {
        if self.store.state().is_dirty {
            self.live_sync.note_user_edit();
        }
    }
}
