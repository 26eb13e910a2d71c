//! SVGA Encoder Library
//!
//! This library turns a directory of numbered PNG frames into an SVGA 2.0
//! animation.

pub mod document_builder;
pub mod frame_loader;
pub mod frame_selector;
pub mod image_reencoder;
pub mod pipeline;
pub mod progress_tracker;

#[cfg(test)]
pub(crate) mod test_support;

pub use document_builder::DocumentBuilder;
pub use frame_loader::{load_frames, FrameSet, SourceFrame};
pub use frame_selector::{select_frames, select_indices};
pub use image_reencoder::{reencode, ReencodeError, MAX_DIMENSION};
pub use pipeline::{convert_directory, EncodeReport};

use std::path::PathBuf;

/// Result type for svga-encoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for svga-encoder operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SVGA core error: {0}")]
    Core(#[from] svga_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Input directory not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No PNG files found in {}", .0.display())]
    NoFrames(PathBuf),

    #[error("Failed to decode frame {}: {source}", path.display())]
    DecodeFrame {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// How frames are laid out in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodeMode {
    /// One image shown on every timeline position (smallest output)
    #[default]
    Single,
    /// Up to `max_frames` distinct images, one visible per position
    Multi,
}

impl std::fmt::Display for EncodeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeMode::Single => f.write_str("single"),
            EncodeMode::Multi => f.write_str("multi"),
        }
    }
}

/// Encoder configuration
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Requested frame rate, snapped to the nearest allowed SVGA rate
    pub fps: i64,
    /// Document layout policy
    pub mode: EncodeMode,
    /// Maximum number of distinct images in multi mode
    pub max_frames: usize,
    /// Worker threads for re-encoding in multi mode (0 = one per CPU)
    pub threads: usize,
}

impl EncoderConfig {
    /// Rejects settings the builder cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.max_frames == 0 {
            return Err(Error::InvalidConfig("max_frames must be at least 1".into()));
        }
        Ok(())
    }

    /// Number of worker threads to use for re-encoding
    pub fn worker_threads(&self) -> usize {
        match self.threads {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            mode: EncodeMode::Single,
            max_frames: 10,
            threads: 1,
        }
    }
}
