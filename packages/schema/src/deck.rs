//! Deck model: metadata plus an ordered sequence of slides.

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockBody};
use crate::slide::Slide;

/// A whole presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub meta: DeckMeta,
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(meta: DeckMeta, slides: Vec<Slide>) -> Self {
        Self { meta, slides }
    }

    /// Single-slide starter deck for a fresh editing session.
    pub fn new_template(title: impl Into<String>) -> Self {
        let title = title.into();
        let slide = Slide::with_blocks(
            "title",
            vec![Block::new(BlockBody::Title {
                text: title.clone(),
            })],
        );
        Self {
            meta: DeckMeta {
                title,
                ..DeckMeta::default()
            },
            slides: vec![slide],
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// Deck-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckMeta {
    pub title: String,
    pub language: String,
    pub theme_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<BrandKit>,
}

impl Default for DeckMeta {
    fn default() -> Self {
        Self {
            title: String::new(),
            language: "en".to_string(),
            theme_id: "default".to_string(),
            brand: None,
        }
    }
}

impl DeckMeta {
    /// Merge a partial update. `None` fields are left untouched.
    pub fn merge(&mut self, patch: &DeckMetaPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(language) = &patch.language {
            self.language = language.clone();
        }
        if let Some(theme_id) = &patch.theme_id {
            self.theme_id = theme_id.clone();
        }
        if let Some(brand) = &patch.brand {
            self.brand = Some(brand.clone());
        }
    }
}

/// Partial update for deck metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckMetaPatch {
    pub title: Option<String>,
    pub language: Option<String>,
    pub theme_id: Option<String>,
    pub brand: Option<BrandKit>,
}

/// Brand-kit overrides applied on top of the theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandKit {
    pub primary_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_font: Option<String>,
}
