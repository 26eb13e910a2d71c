//! Loading numbered PNG frames from a directory
//!
//! Frames are ordered by the number embedded in their file name: the digits
//! after a `frame_` marker, or failing that the digits right before the
//! `.png` extension. Names without either sort as 0. The sort is stable, so
//! frames with equal keys keep the directory enumeration order.

use crate::{image_reencoder, Error, Result};
use image::imageops::FilterType;
use image::{ImageError, ImageReader};
use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::Path;

const FRAME_MARKER: &str = "frame_";
const PNG_EXTENSION: &str = ".png";

/// A single source image
#[derive(Debug, Clone)]
pub struct SourceFrame {
    /// File name without extension, used as the image key
    pub key: String,
    /// Sort key extracted from the file name
    pub index: u64,
    /// Encoded PNG bytes
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl SourceFrame {
    /// Returns the size of the frame data in bytes
    pub fn data_size(&self) -> usize {
        self.data.len()
    }
}

/// Ordered, non-empty frame sequence sharing one canonical size
#[derive(Debug, Clone)]
pub struct FrameSet {
    frames: Vec<SourceFrame>,
    width: u32,
    height: u32,
}

impl FrameSet {
    /// Creates a frame set whose canonical size is the first frame's size.
    /// Returns `None` for an empty sequence.
    pub fn new(frames: Vec<SourceFrame>) -> Option<Self> {
        let first = frames.first()?;
        let (width, height) = (first.width, first.height);
        Some(Self {
            frames,
            width,
            height,
        })
    }

    /// Canonical (width, height) of every frame
    pub fn canonical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[SourceFrame] {
        &self.frames
    }

    pub fn first(&self) -> &SourceFrame {
        &self.frames[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceFrame> {
        self.frames.iter()
    }

    /// Sum of all frame data sizes in bytes
    pub fn original_size(&self) -> usize {
        self.frames.iter().map(SourceFrame::data_size).sum()
    }
}

/// Strips a case-insensitive `.png` extension, if present
fn strip_png_extension(file_name: &str) -> Option<&str> {
    let split = file_name.len().checked_sub(PNG_EXTENSION.len())?;
    let extension = file_name.get(split..)?;
    if extension.eq_ignore_ascii_case(PNG_EXTENSION) {
        file_name.get(..split)
    } else {
        None
    }
}

/// Parses a run of ASCII digits, saturating at `u64::MAX`
fn parse_digits(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

/// Extracts the ordering key from a frame file name
pub fn frame_sort_key(file_name: &str) -> u64 {
    for (pos, _) in file_name.match_indices(FRAME_MARKER) {
        let rest = &file_name[pos + FRAME_MARKER.len()..];
        let tail = rest.trim_start_matches(|c: char| c.is_ascii_digit());
        let digits = &rest[..rest.len() - tail.len()];
        if !digits.is_empty() {
            return parse_digits(digits);
        }
    }

    if let Some(stem) = strip_png_extension(file_name) {
        let head = stem.trim_end_matches(|c: char| c.is_ascii_digit());
        let digits = &stem[head.len()..];
        if !digits.is_empty() {
            return parse_digits(digits);
        }
    }

    0
}

/// Stable ascending sort of file names by [`frame_sort_key`]
pub fn order_by_frame_index<S: AsRef<str>>(mut names: Vec<S>) -> Vec<S> {
    names.sort_by_cached_key(|name| frame_sort_key(name.as_ref()));
    names
}

/// Reads image dimensions from the header without decoding pixels
fn probe_dimensions(data: &[u8]) -> std::result::Result<(u32, u32), ImageError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(ImageError::IoError)?
        .into_dimensions()
}

/// Decodes, resamples to exactly `width` x `height` and re-encodes as PNG
fn resample_png(data: &[u8], width: u32, height: u32) -> std::result::Result<Vec<u8>, ImageError> {
    let img = image::load_from_memory(data)?;
    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    image_reencoder::encode_png(&resized)
}

/// Loads all PNG frames from `dir`, ordered by frame index.
///
/// The first frame's size becomes the canonical size; frames of any other
/// size are resampled and their stored bytes replaced by the resampled PNG.
pub fn load_frames(dir: &Path) -> Result<FrameSet> {
    if !dir.exists() {
        return Err(Error::InputNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if strip_png_extension(&name).is_some() {
            names.push(name);
        }
    }

    let names = order_by_frame_index(names);
    tracing::info!(dir = %dir.display(), count = names.len(), "found PNG frames");

    let mut frames = Vec::with_capacity(names.len());
    let mut canonical: Option<(u32, u32)> = None;
    let mut seen_keys = HashSet::new();

    for name in names {
        let path = dir.join(&name);
        let data = fs::read(&path)?;
        let (width, height) = probe_dimensions(&data).map_err(|source| Error::DecodeFrame {
            path: path.clone(),
            source,
        })?;

        let (canonical_width, canonical_height) = *canonical.get_or_insert((width, height));
        let data = if (width, height) == (canonical_width, canonical_height) {
            data
        } else {
            tracing::warn!(
                frame = %name,
                width,
                height,
                canonical_width,
                canonical_height,
                "resampling frame to canonical size"
            );
            resample_png(&data, canonical_width, canonical_height)
                .map_err(|source| Error::DecodeFrame { path, source })?
        };

        let key = strip_png_extension(&name).unwrap_or(&name).to_string();
        if !seen_keys.insert(key.clone()) {
            tracing::warn!(key = %key, "duplicate frame key, later frame replaces earlier image");
        }

        let index = frame_sort_key(&name);
        tracing::debug!(key = %key, index, bytes = data.len(), "loaded frame");

        frames.push(SourceFrame {
            key,
            index,
            data,
            width: canonical_width,
            height: canonical_height,
        });
    }

    FrameSet::new(frames).ok_or_else(|| Error::NoFrames(dir.to_path_buf()))
}
