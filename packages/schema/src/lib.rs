//! # Deckflow Schema
//!
//! The value model shared by every Deckflow component: a presentation is a
//! [`Deck`] of [`Slide`]s, and each slide is an ordered list of [`Block`]s.
//!
//! ## Design Principles
//!
//! 1. **Immutable values**: the editor engine replaces decks wholesale; it
//!    never hands out shared mutable references to them
//! 2. **Closed block union**: every block kind is a variant of [`BlockBody`],
//!    so new kinds are caught at compile time
//! 3. **Partial updates as patches**: edits travel as all-`Option` patch
//!    structs ([`DeckMetaPatch`], [`SlidePatch`], [`BlockPatch`]) that merge
//!    field-by-field
//!
//! These shapes serialize with serde and are treated as opaque value objects
//! by persistence and AI collaborators.

mod block;
mod deck;
mod slide;

pub use block::{Block, BlockBody, BlockPatch, Violation};
pub use deck::{BrandKit, Deck, DeckMeta, DeckMetaPatch};
pub use slide::{Slide, SlidePatch};

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Mint a process-unique id with a readable prefix (`"image-7"`).
///
/// Block ids only need to be unique within a running session; decks loaded
/// from persistence keep whatever ids they were saved with.
pub fn fresh_id(prefix: &str) -> String {
    let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{n}")
}
