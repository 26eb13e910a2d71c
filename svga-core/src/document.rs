//! In-memory SVGA animation document

use crate::{AnimationParams, Error, Result, Sprite};
use std::collections::BTreeMap;

/// Version string written into every document
pub const DOCUMENT_VERSION: &str = "2.0.0";

/// Image key -> encoded image bytes (PNG). Ordered so output is deterministic.
pub type ImageDictionary = BTreeMap<String, Vec<u8>>;

/// Complete animation: parameters, images and sprite timelines
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDocument {
    /// Format version, always [`DOCUMENT_VERSION`] for built documents
    pub version: String,
    /// Movie parameters
    pub params: AnimationParams,
    /// Images referenced by sprites
    pub images: ImageDictionary,
    /// Sprites in drawing order
    pub sprites: Vec<Sprite>,
}

impl AnimationDocument {
    /// Creates an empty document for the given parameters
    pub fn new(params: AnimationParams) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            params,
            images: ImageDictionary::new(),
            sprites: Vec::new(),
        }
    }

    /// Adds an image, replacing any previous image with the same key
    pub fn insert_image(&mut self, key: impl Into<String>, data: Vec<u8>) {
        let key = key.into();
        if self.images.insert(key.clone(), data).is_some() {
            tracing::warn!(key = %key, "replacing image with duplicate key");
        }
    }

    /// Appends a sprite
    pub fn push_sprite(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    /// Checks that every sprite references a known image, covers exactly
    /// `frame_count` positions and uses alpha values within [0, 1].
    pub fn validate(&self) -> Result<()> {
        for sprite in &self.sprites {
            if !self.images.contains_key(&sprite.image_key) {
                return Err(Error::MissingImage(sprite.image_key.clone()));
            }
            if sprite.frames.len() != self.params.frame_count as usize {
                return Err(Error::TimelineLength {
                    image_key: sprite.image_key.clone(),
                    expected: self.params.frame_count,
                    actual: sprite.frames.len(),
                });
            }
            if let Some((frame, state)) = sprite
                .frames
                .iter()
                .enumerate()
                .find(|(_, f)| !(0.0..=1.0).contains(&f.alpha))
            {
                return Err(Error::InvalidAlpha {
                    image_key: sprite.image_key.clone(),
                    frame,
                    alpha: state.alpha,
                });
            }
        }
        Ok(())
    }

    /// Total size of all stored images in bytes
    pub fn image_bytes(&self) -> usize {
        self.images.values().map(Vec::len).sum()
    }

    /// Summarizes the document for reporting
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            version: self.version.clone(),
            view_box_width: self.params.view_box_width,
            view_box_height: self.params.view_box_height,
            fps: self.params.fps.get(),
            frame_count: self.params.frame_count,
            duration_ms: self.params.duration_ms(),
            image_count: self.images.len(),
            image_bytes: self.image_bytes(),
            sprite_count: self.sprites.len(),
            visible_entries: self
                .sprites
                .iter()
                .flat_map(|s| s.frames.iter())
                .filter(|f| f.is_visible())
                .count(),
        }
    }
}

/// Counts and sizes describing a document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocumentSummary {
    pub version: String,
    pub view_box_width: f32,
    pub view_box_height: f32,
    pub fps: u32,
    pub frame_count: u32,
    pub duration_ms: u64,
    pub image_count: usize,
    pub image_bytes: usize,
    pub sprite_count: usize,
    /// Number of (sprite, position) pairs with non-zero alpha
    pub visible_entries: usize,
}

#[cfg(feature = "serde")]
impl DocumentSummary {
    /// Renders the summary as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Fps, FrameState, Layout};

    fn document(frame_count: u32) -> AnimationDocument {
        let params = AnimationParams::new(10, 10, Fps::default(), frame_count);
        let mut doc = AnimationDocument::new(params);
        doc.insert_image("frame_0001", vec![1, 2, 3]);
        doc
    }

    #[test]
    fn test_validate_ok() {
        let mut doc = document(3);
        doc.push_sprite(Sprite::always_visible("frame_0001", Layout::full_canvas(10.0, 10.0), 3));
        assert!(doc.validate().is_ok());
        assert_eq!(doc.version, DOCUMENT_VERSION);
    }

    #[test]
    fn test_validate_missing_image() {
        let mut doc = document(3);
        doc.push_sprite(Sprite::always_visible("nope", Layout::full_canvas(10.0, 10.0), 3));
        assert!(matches!(doc.validate(), Err(Error::MissingImage(key)) if key == "nope"));
    }

    #[test]
    fn test_validate_timeline_length() {
        let mut doc = document(3);
        doc.push_sprite(Sprite::always_visible("frame_0001", Layout::full_canvas(10.0, 10.0), 2));
        assert!(matches!(
            doc.validate(),
            Err(Error::TimelineLength { expected: 3, actual: 2, .. })
        ));
    }

    #[test]
    fn test_validate_alpha_range() {
        let mut doc = document(1);
        let mut state = FrameState::visible(Layout::full_canvas(10.0, 10.0));
        state.alpha = 1.5;
        doc.push_sprite(Sprite::new("frame_0001", vec![state]));
        assert!(matches!(doc.validate(), Err(Error::InvalidAlpha { frame: 0, .. })));
    }

    #[test]
    fn test_summary() {
        let mut doc = document(4);
        let layout = Layout::full_canvas(10.0, 10.0);
        doc.push_sprite(Sprite::flipbook_page("frame_0001", layout, 4, 1));
        doc.push_sprite(Sprite::always_visible("frame_0001", layout, 4));

        let summary = doc.summary();
        assert_eq!(summary.image_count, 1);
        assert_eq!(summary.image_bytes, 3);
        assert_eq!(summary.sprite_count, 2);
        assert_eq!(summary.visible_entries, 5);
        assert_eq!(summary.fps, 30);
    }
}
