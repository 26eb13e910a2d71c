//! Sprite timelines: per-frame layout, transform and visibility

/// Rectangle a sprite's image is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    /// A layout covering the whole `width` x `height` canvas
    pub fn full_canvas(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// Returns true if the rectangle has no area
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// 2x3 affine matrix `[a c tx; b d ty]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// State of a sprite at one timeline position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Opacity (0.0 = hidden, 1.0 = fully visible)
    pub alpha: f32,
    /// Where the sprite's image is drawn
    pub layout: Layout,
    /// Transform applied to the layout
    pub transform: Transform2D,
}

impl FrameState {
    /// Fully visible, untransformed state covering `layout`
    pub fn visible(layout: Layout) -> Self {
        Self {
            alpha: 1.0,
            layout,
            transform: Transform2D::IDENTITY,
        }
    }

    /// Hidden state. The layout stays fully specified so players never see a
    /// zero-sized rectangle.
    pub fn hidden(layout: Layout) -> Self {
        Self {
            alpha: 0.0,
            layout,
            transform: Transform2D::IDENTITY,
        }
    }

    /// Checks if the sprite is drawn at this position
    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }
}

/// A sprite bound to one image, with one state per timeline position
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Key into the document's image dictionary
    pub image_key: String,
    /// One entry per timeline position
    pub frames: Vec<FrameState>,
}

impl Sprite {
    /// Creates a new sprite
    pub fn new(image_key: impl Into<String>, frames: Vec<FrameState>) -> Self {
        Self {
            image_key: image_key.into(),
            frames,
        }
    }

    /// Sprite visible for `frame_count` positions
    pub fn always_visible(image_key: impl Into<String>, layout: Layout, frame_count: u32) -> Self {
        let frames = (0..frame_count).map(|_| FrameState::visible(layout)).collect();
        Self::new(image_key, frames)
    }

    /// Sprite visible only at position `shown_at` out of `frame_count`
    pub fn flipbook_page(
        image_key: impl Into<String>,
        layout: Layout,
        frame_count: u32,
        shown_at: usize,
    ) -> Self {
        let frames = (0..frame_count as usize)
            .map(|position| {
                if position == shown_at {
                    FrameState::visible(layout)
                } else {
                    FrameState::hidden(layout)
                }
            })
            .collect();
        Self::new(image_key, frames)
    }

    /// Timeline positions where this sprite is visible
    pub fn visible_positions(&self) -> Vec<usize> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_visible())
            .map(|(i, _)| i)
            .collect()
    }
}
