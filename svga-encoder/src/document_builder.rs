//! Assembling SVGA documents from loaded frames

use crate::frame_loader::{FrameSet, SourceFrame};
use crate::progress_tracker::ProgressTracker;
use crate::{frame_selector, image_reencoder, EncodeMode, EncoderConfig, Result};
use svga_core::{AnimationDocument, AnimationParams, Fps, Layout, Sprite};

const REPORT_INTERVAL: u64 = 5;

/// Builds animation documents according to an [`EncoderConfig`]
pub struct DocumentBuilder {
    config: EncoderConfig,
}

impl DocumentBuilder {
    /// Creates a new document builder with the given configuration
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Builds and validates a document using the configured mode
    pub fn build(&self, frames: &FrameSet) -> Result<AnimationDocument> {
        self.config.validate()?;

        let doc = match self.config.mode {
            EncodeMode::Single => self.build_single(frames),
            EncodeMode::Multi => self.build_multi(frames),
        };
        doc.validate()?;

        Ok(doc)
    }

    /// One image, one sprite, visible on every timeline position.
    ///
    /// Only the first frame's bytes are stored; the timeline still has one
    /// position per loaded frame.
    pub fn build_single(&self, frames: &FrameSet) -> AnimationDocument {
        let (width, height) = frames.canonical_size();
        let frame_count = frames.len() as u32;
        let first = frames.first();

        let params = AnimationParams::new(width, height, Fps::snap(self.config.fps), frame_count);
        let layout = Layout::full_canvas(params.view_box_width, params.view_box_height);

        let mut doc = AnimationDocument::new(params);
        doc.insert_image(first.key.clone(), first.data.clone());
        doc.push_sprite(Sprite::always_visible(first.key.clone(), layout, frame_count));

        tracing::info!(
            frames = frame_count,
            image = %first.key,
            "built single-image document"
        );
        doc
    }

    /// Flipbook of up to `max_frames` re-encoded images.
    ///
    /// Sprite `s` is visible only at timeline position `s`. The view box is
    /// the first selected frame's size, never a re-encoded (possibly
    /// downscaled) size.
    pub fn build_multi(&self, frames: &FrameSet) -> AnimationDocument {
        let selected = frame_selector::select_frames(frames.frames(), self.config.max_frames);
        let frame_count = selected.len() as u32;
        let (width, height) = selected
            .first()
            .map(|f| (f.width, f.height))
            .unwrap_or_else(|| frames.canonical_size());

        tracing::info!(
            total = frames.len(),
            selected = frame_count,
            max_frames = self.config.max_frames,
            "selected frames"
        );

        let params = AnimationParams::new(width, height, Fps::snap(self.config.fps), frame_count);
        let layout = Layout::full_canvas(params.view_box_width, params.view_box_height);
        let encoded = reencode_all(&selected, self.config.worker_threads());

        let mut doc = AnimationDocument::new(params);
        for (frame, data) in selected.iter().zip(encoded) {
            doc.insert_image(frame.key.clone(), data);
        }
        for (position, frame) in selected.iter().enumerate() {
            doc.push_sprite(Sprite::flipbook_page(
                frame.key.clone(),
                layout,
                frame_count,
                position,
            ));
        }

        tracing::info!(
            images = doc.images.len(),
            image_bytes = doc.image_bytes(),
            "built multi-image document"
        );
        doc
    }
}

/// Re-encodes one frame, keeping the original bytes if re-encoding fails
fn reencode_frame(frame: &SourceFrame) -> Vec<u8> {
    match image_reencoder::reencode(&frame.data) {
        Ok(data) => {
            tracing::debug!(
                key = %frame.key,
                before = frame.data.len(),
                after = data.len(),
                "re-encoded frame"
            );
            data
        }
        Err(e) => {
            tracing::warn!(key = %frame.key, error = %e, "re-encode failed, keeping original bytes");
            frame.data.clone()
        }
    }
}

/// Re-encodes frames on up to `threads` scoped threads, preserving order
fn reencode_all(frames: &[&SourceFrame], threads: usize) -> Vec<Vec<u8>> {
    let tracker = ProgressTracker::new(frames.len() as u64, "Re-encoding frames");
    let encode = |frame: &SourceFrame| {
        let data = reencode_frame(frame);
        tracker.increment_and_report(REPORT_INTERVAL);
        data
    };

    if threads <= 1 || frames.len() <= 1 {
        return frames.iter().map(|&f| encode(f)).collect();
    }

    let chunk_size = frames.len().div_ceil(threads);
    std::thread::scope(|scope| {
        let handles: Vec<_> = frames
            .chunks(chunk_size)
            .map(|chunk| {
                let encode = &encode;
                scope.spawn(move || chunk.iter().map(|&f| encode(f)).collect::<Vec<_>>())
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}
