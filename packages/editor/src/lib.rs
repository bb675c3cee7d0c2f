//! # Deckflow Editor
//!
//! Editor state engine for AI-assisted slide decks.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ triggers: keystrokes, palette, network      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: one synchronous dispatch path       │
//! │  - DocumentStore: total reducer over        │
//! │    immutable Arc<Deck> snapshots            │
//! │  - History: bounded undo/redo stacks        │
//! │  - LiveSyncReconciler: merges the           │
//! │    generation stream without touching       │
//! │    history or dirty-state                   │
//! │  - CommandRegistry: palette + shortcuts     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ collaborators: persistence, AI transforms   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One writer**: every mutation funnels through synchronous FIFO
//!    dispatch; async completions re-enter the same path
//! 2. **Snapshots, not diffs**: the deck is replaced wholesale on each
//!    mutation, so undo is pointer swapping
//! 3. **Total reducer**: invalid actions are logged no-ops, never panics
//! 4. **Externally-authored content bypasses history**: the live stream
//!    must not pollute undo or trip autosave
//!
//! ## Usage
//!
//! ```rust
//! use deckflow_editor::{Action, EditorSession, SessionOptions};
//! use deckflow_schema::{BlockPatch, Deck};
//!
//! let mut session = EditorSession::new(
//!     Deck::new_template("Quarterly Review"),
//!     SessionOptions::default(),
//! );
//!
//! session.dispatch(Action::UpdateBlock {
//!     slide_index: 0,
//!     block_index: 0,
//!     patch: BlockPatch::text("Q3 Review"),
//! });
//! assert!(session.state().is_dirty);
//!
//! session.undo();
//! assert!(session.can_redo());
//! ```

mod action;
mod collab;
mod command;
mod errors;
mod history;
mod keyboard;
mod reconcile;
mod session;
mod store;

pub use action::Action;
pub use collab::{DeckStore, GeneratedImage, SlideTransformer, TransformOutcome};
pub use command::{Command, CommandCategory, CommandContext, CommandRegistry, CommandSummary, UiEvent};
pub use errors::{SaveError, TransformError};
pub use history::{History, DEFAULT_HISTORY_CAPACITY};
pub use keyboard::{KeyInput, Platform, Shortcut};
pub use reconcile::{LiveSyncReconciler, LiveUpdate};
pub use session::{EditorSession, SessionOptions, TransformHandle};
pub use store::{DocumentStore, EditorState};

// Re-export the value model for convenience.
pub use deckflow_schema as schema;
