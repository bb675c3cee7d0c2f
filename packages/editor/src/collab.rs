//! # Collaborator Seams
//!
//! Traits for the external services the engine depends on but does not
//! implement: persistence and AI content generation. The engine only ever
//! sees their completions, re-entering through ordinary dispatch; timeouts
//! and retries are the collaborator's business, surfaced here as plain
//! `Result`s.

use deckflow_schema::{Deck, Slide};

use crate::errors::{SaveError, TransformError};

/// Persistence collaborator. The deck shape is opaque to it beyond what
/// serde exposes.
pub trait DeckStore {
    fn save(&mut self, deck: &Deck) -> Result<(), SaveError>;
    fn load(&mut self) -> Result<Deck, SaveError>;
}

/// AI transform collaborator.
pub trait SlideTransformer {
    /// Rewrite one slide according to a natural-language instruction.
    fn transform(
        &mut self,
        instruction: &str,
        slide: &Slide,
    ) -> Result<TransformOutcome, TransformError>;

    /// Produce an image for a slide.
    fn generate_image(&mut self, slide: &Slide) -> Result<GeneratedImage, TransformError>;
}

/// Successful transform result. The new slide may change block kinds; it
/// is applied via `AiReplaceSlide`, never by implicit mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutcome {
    pub slide: Slide,
    /// Human-readable list of what changed, for the review UI.
    pub changes: Vec<String>,
    pub explanation: String,
}

/// Successful image generation result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub url: String,
}
