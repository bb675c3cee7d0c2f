//! Block content model.
//!
//! A block is the atomic unit of slide content. Its `kind` tag is identity:
//! ordinary edits merge a [`BlockPatch`] into the existing variant and never
//! change the tag. Only whole-slide replacement (the AI transform path) can
//! swap a block for one of a different kind.

use serde::{Deserialize, Serialize};

use crate::fresh_id;

/// One content unit on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Stable id used for edit addressing (`editing_block`, violations).
    pub id: String,
    #[serde(flatten)]
    pub body: BlockBody,
}

impl Block {
    /// Wrap a body with a freshly minted id.
    pub fn new(body: BlockBody) -> Self {
        Self {
            id: fresh_id(body.kind()),
            body,
        }
    }

    /// Deep copy with a new id, for slide duplication.
    pub fn duplicated(&self) -> Self {
        Self {
            id: fresh_id(self.body.kind()),
            body: self.body.clone(),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.body, BlockBody::Image { .. })
    }
}

/// The closed union of block kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BlockBody {
    Title {
        text: String,
    },
    Text {
        text: String,
    },
    BulletList {
        items: Vec<String>,
    },
    Image {
        url: Option<String>,
        alt: String,
        caption: Option<String>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Callout {
        text: String,
        tone: String,
    },
    Stat {
        value: String,
        label: String,
        delta: Option<String>,
    },
    TimelineStep {
        title: String,
        description: String,
    },
    IconCard {
        icon: String,
        title: String,
        text: String,
    },
    NumberedCard {
        number: u32,
        title: String,
        text: String,
    },
}

impl BlockBody {
    /// The serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            BlockBody::Title { .. } => "title",
            BlockBody::Text { .. } => "text",
            BlockBody::BulletList { .. } => "bullet-list",
            BlockBody::Image { .. } => "image",
            BlockBody::Table { .. } => "table",
            BlockBody::Callout { .. } => "callout",
            BlockBody::Stat { .. } => "stat",
            BlockBody::TimelineStep { .. } => "timeline-step",
            BlockBody::IconCard { .. } => "icon-card",
            BlockBody::NumberedCard { .. } => "numbered-card",
        }
    }

    /// Image url, if this is an image block.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            BlockBody::Image { url, .. } => url.as_deref(),
            _ => None,
        }
    }

    /// Merge a patch into this body. Fields that do not apply to the
    /// current kind are ignored; the kind tag never changes.
    pub fn merge(&mut self, patch: &BlockPatch) {
        fn set(dst: &mut String, src: &Option<String>) {
            if let Some(v) = src {
                *dst = v.clone();
            }
        }

        match self {
            BlockBody::Title { text } | BlockBody::Text { text } => {
                set(text, &patch.text);
            }
            BlockBody::BulletList { items } => {
                if let Some(v) = &patch.items {
                    *items = v.clone();
                }
            }
            BlockBody::Image { url, alt, caption } => {
                if let Some(v) = &patch.url {
                    *url = Some(v.clone());
                }
                set(alt, &patch.alt);
                if let Some(v) = &patch.caption {
                    *caption = Some(v.clone());
                }
            }
            BlockBody::Table { headers, rows } => {
                if let Some(v) = &patch.headers {
                    *headers = v.clone();
                }
                if let Some(v) = &patch.rows {
                    *rows = v.clone();
                }
            }
            BlockBody::Callout { text, tone } => {
                set(text, &patch.text);
                set(tone, &patch.tone);
            }
            BlockBody::Stat {
                value,
                label,
                delta,
            } => {
                set(value, &patch.value);
                set(label, &patch.label);
                if let Some(v) = &patch.delta {
                    *delta = Some(v.clone());
                }
            }
            BlockBody::TimelineStep { title, description } => {
                set(title, &patch.title);
                set(description, &patch.description);
            }
            BlockBody::IconCard { icon, title, text } => {
                set(icon, &patch.icon);
                set(title, &patch.title);
                set(text, &patch.text);
            }
            BlockBody::NumberedCard {
                number,
                title,
                text,
            } => {
                if let Some(v) = patch.number {
                    *number = v;
                }
                set(title, &patch.title);
                set(text, &patch.text);
            }
        }
    }
}

/// Flat partial update for a block. `None` fields leave the block untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockPatch {
    pub text: Option<String>,
    pub title: Option<String>,
    pub items: Option<Vec<String>>,
    pub url: Option<String>,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub headers: Option<Vec<String>>,
    pub rows: Option<Vec<Vec<String>>>,
    pub tone: Option<String>,
    pub value: Option<String>,
    pub label: Option<String>,
    pub delta: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub number: Option<u32>,
}

impl BlockPatch {
    /// Patch setting only the text field.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Patch setting only the image url.
    pub fn image_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

/// A content-constraint violation reported against a block.
///
/// Violations are a derived side-channel: they inform save gating in the UI
/// layer and never block edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_serialization_is_kind_tagged() {
        let block = Block {
            id: "title-1".to_string(),
            body: BlockBody::Title {
                text: "Q3 Review".to_string(),
            },
        };

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["kind"], "title");
        assert_eq!(json["id"], "title-1");
        assert_eq!(json["text"], "Q3 Review");

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_merge_updates_matching_fields_only() {
        let mut body = BlockBody::Callout {
            text: "old".to_string(),
            tone: "info".to_string(),
        };

        let patch = BlockPatch {
            text: Some("new".to_string()),
            // Irrelevant for a callout; must be ignored.
            url: Some("https://example.com/x.png".to_string()),
            ..BlockPatch::default()
        };
        body.merge(&patch);

        assert_eq!(
            body,
            BlockBody::Callout {
                text: "new".to_string(),
                tone: "info".to_string(),
            }
        );
    }

    #[test]
    fn test_merge_never_changes_kind() {
        let mut body = BlockBody::Text {
            text: "hello".to_string(),
        };
        body.merge(&BlockPatch::image_url("https://example.com/a.png"));
        assert_eq!(body.kind(), "text");
    }

    #[test]
    fn test_duplicated_block_gets_new_id() {
        let block = Block::new(BlockBody::Text {
            text: "body".to_string(),
        });
        let copy = block.duplicated();
        assert_ne!(copy.id, block.id);
        assert_eq!(copy.body, block.body);
    }
}
