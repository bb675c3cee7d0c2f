//! # Live Sync Reconciliation
//!
//! Merges an asynchronously-growing, externally-authored deck — slides are
//! generated one at a time — plus an independent stream of per-slide image
//! urls, into a store the user may be editing concurrently.
//!
//! ## Deck merge policy
//!
//! Only slide *additions* are merged. Edits the generator makes to slides
//! it already delivered are never pushed over local state. Once the user
//! has edited and the session is no longer live, incoming decks are
//! dropped entirely; while live, merges always win so the viewport can
//! follow generation progress.
//!
//! Merges go through the history-bypass replace, so a background stream
//! can neither extend the user's undo history nor mark the deck dirty
//! (which would race autosave into writing generator-authored content
//! back as if the user typed it).
//!
//! ## Image track
//!
//! Slide content and slide images arrive on independent timelines (image
//! generation is slower), so images reconcile on their own idempotent
//! track keyed by slide index. Known limitation: applied urls carry no
//! authorship tag, so a late generated image can overwrite a url the user
//! set by hand after generation began. Tracked as an open issue rather
//! than silently resolved.

use std::collections::HashMap;
use std::sync::Arc;

use deckflow_schema::{BlockPatch, Deck};
use tracing::debug;

use crate::action::Action;
use crate::store::DocumentStore;

/// One delivery from the live generation feed.
#[derive(Debug, Clone)]
pub struct LiveUpdate {
    pub deck: Arc<Deck>,
    pub images_by_slide: HashMap<usize, String>,
}

/// Reconciles live-feed deliveries into a [`DocumentStore`].
#[derive(Debug)]
pub struct LiveSyncReconciler {
    previous_remote: Option<Arc<Deck>>,
    /// Latched the first time a local edit dirties the deck; never reset
    /// while the session runs.
    has_user_interacted: bool,
    applied_images: HashMap<usize, String>,
    live: bool,
}

impl LiveSyncReconciler {
    pub fn new(live: bool) -> Self {
        Self {
            previous_remote: None,
            has_user_interacted: false,
            applied_images: HashMap::new(),
            live,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Generation framing ended; stop prioritising the stream over local
    /// edits.
    pub fn finish(&mut self) {
        self.live = false;
    }

    pub fn has_user_interacted(&self) -> bool {
        self.has_user_interacted
    }

    /// Latch the sticky interaction flag. Called by the session whenever a
    /// local dispatch leaves the deck dirty.
    pub fn note_user_edit(&mut self) {
        self.has_user_interacted = true;
    }

    /// Apply one feed delivery: the deck pass, then each image pair.
    pub fn apply(&mut self, store: &mut DocumentStore, update: LiveUpdate) {
        self.sync_deck(store, update.deck);
        for (slide_index, url) in update.images_by_slide {
            self.sync_image(store, slide_index, &url);
        }
    }

    /// Deck pass: merge slide additions, if policy allows.
    pub fn sync_deck(&mut self, store: &mut DocumentStore, remote: Arc<Deck>) {
        self.latch_interaction(store);

        if let Some(previous) = &self.previous_remote {
            if Arc::ptr_eq(previous, &remote) {
                return;
            }
        }

        let previous_len = self
            .previous_remote
            .as_ref()
            .map(|d| d.slides.len())
            .unwrap_or_else(|| store.deck().slides.len());
        let remote_len = remote.slides.len();

        if remote_len <= previous_len {
            // Additions only; remote edits to delivered slides lose.
            debug!(remote_len, previous_len, "live sync: no new slides, ignoring");
            self.previous_remote = Some(remote);
            return;
        }

        if self.has_user_interacted && !self.live {
            debug!(remote_len, "live sync: user has edited, dropping merge");
            self.previous_remote = Some(remote);
            return;
        }

        store.dispatch(Action::replace_deck_silent(Arc::clone(&remote)));

        if self.live && remote_len > 0 {
            // Viewport follows generation progress.
            store.dispatch(Action::SelectSlide {
                index: remote_len - 1,
            });
        }

        self.previous_remote = Some(remote);
    }

    /// Image pass: apply one `(slide_index, url)` pair, idempotently.
    pub fn sync_image(&mut self, store: &mut DocumentStore, slide_index: usize, url: &str) {
        self.latch_interaction(store);

        if self.applied_images.get(&slide_index).map(String::as_str) == Some(url) {
            return;
        }

        let Some(slide) = store.deck().slides.get(slide_index) else {
            debug!(slide_index, "image sync: slide not delivered yet, skipping");
            return;
        };

        let Some(block_index) = slide.first_image_block() else {
            debug!(slide_index, "image sync: slide has no image block, skipping");
            return;
        };

        if slide.blocks[block_index].body.image_url() == Some(url) {
            // Already present; record without dispatching.
            self.applied_images
                .insert(slide_index, url.to_string());
            return;
        }

        store.dispatch(Action::UpdateBlock {
            slide_index,
            block_index,
            patch: BlockPatch::image_url(url),
        });
        self.applied_images.insert(slide_index, url.to_string());
    }

    fn latch_interaction(&mut self, store: &DocumentStore) {
        if store.state().is_dirty {
            self.has_user_interacted = true;
        }
    }
}
