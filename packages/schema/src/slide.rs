//! Slide model.

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockBody};

/// One page of a deck: a type tag, an optional layout variant and an
/// ordered sequence of blocks.
///
/// Slide kinds are an open set (the generation collaborator is free to
/// invent them), so the tag is a plain string rather than an enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    pub blocks: Vec<Block>,
}

impl Slide {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            layout: None,
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(kind: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            kind: kind.into(),
            layout: None,
            blocks,
        }
    }

    /// Deep copy with fresh block ids, for slide duplication.
    pub fn duplicated(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            layout: self.layout.clone(),
            blocks: self.blocks.iter().map(Block::duplicated).collect(),
        }
    }

    pub fn block_by_id(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Index of the first image block, if any. The live image stream
    /// targets this block.
    pub fn first_image_block(&self) -> Option<usize> {
        self.blocks.iter().position(Block::is_image)
    }

    /// Merge a partial update. `None` fields are left untouched.
    pub fn merge(&mut self, patch: &SlidePatch) {
        if let Some(kind) = &patch.kind {
            self.kind = kind.clone();
        }
        if let Some(layout) = &patch.layout {
            self.layout = Some(layout.clone());
        }
    }

    /// Slide title text, for palette and notification labels.
    pub fn title_text(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match &b.body {
            BlockBody::Title { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Partial update for slide-level fields (blocks are edited individually).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidePatch {
    pub kind: Option<String>,
    pub layout: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockBody;

    fn sample_slide() -> Slide {
        Slide::with_blocks(
            "content",
            vec![
                Block::new(BlockBody::Title {
                    text: "Roadmap".to_string(),
                }),
                Block::new(BlockBody::Image {
                    url: None,
                    alt: "hero".to_string(),
                    caption: None,
                }),
            ],
        )
    }

    #[test]
    fn test_first_image_block() {
        let slide = sample_slide();
        assert_eq!(slide.first_image_block(), Some(1));

        let bare = Slide::new("content");
        assert_eq!(bare.first_image_block(), None);
    }

    #[test]
    fn test_duplicated_rewrites_block_ids() {
        let slide = sample_slide();
        let copy = slide.duplicated();

        assert_eq!(copy.kind, slide.kind);
        assert_eq!(copy.blocks.len(), slide.blocks.len());
        for (a, b) in slide.blocks.iter().zip(&copy.blocks) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.body, b.body);
        }
    }

    #[test]
    fn test_merge_partial() {
        let mut slide = sample_slide();
        slide.merge(&SlidePatch {
            layout: Some("two-column".to_string()),
            ..SlidePatch::default()
        });
        assert_eq!(slide.layout.as_deref(), Some("two-column"));
        assert_eq!(slide.kind, "content");
    }
}
