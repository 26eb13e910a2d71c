//! SVGA Core Library
//!
//! This library provides the in-memory animation document and the binary
//! container format (zlib-compressed protobuf `MovieEntity`) for SVGA 2.0
//! animations.

pub mod container;
pub mod document;
pub mod params;
pub mod timeline;

pub use container::{decode, encode, save};
pub use document::{AnimationDocument, DocumentSummary, ImageDictionary, DOCUMENT_VERSION};
pub use params::{AnimationParams, Fps, ALLOWED_FPS};
pub use timeline::{FrameState, Layout, Sprite, Transform2D};

/// Result type for svga-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for svga-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Unsupported version: {0}, expected '2.0.0'")]
    UnsupportedVersion(String),

    #[error("Movie parameters missing")]
    MissingParams,

    #[error("Sprite references unknown image: {0}")]
    MissingImage(String),

    #[error("Sprite '{image_key}' has {actual} frames, expected {expected}")]
    TimelineLength {
        image_key: String,
        expected: u32,
        actual: usize,
    },

    #[error("Alpha out of range for sprite '{image_key}' at frame {frame}: {alpha}")]
    InvalidAlpha {
        image_key: String,
        frame: usize,
        alpha: f32,
    },
}
