//! End-to-end conversion from a frame directory to an SVGA file

use crate::{frame_loader, DocumentBuilder, EncodeMode, EncoderConfig, Result};
use std::path::{Path, PathBuf};
use svga_core::Fps;

/// Outcome of a successful conversion
#[derive(Debug, Clone)]
pub struct EncodeReport {
    /// Where the animation was written
    pub output_path: PathBuf,
    /// Size of the written file in bytes
    pub output_size: usize,
    /// Sum of all loaded frame sizes in bytes
    pub original_size: usize,
    /// Number of frames found in the input directory
    pub source_frames: usize,
    /// Number of timeline positions in the document
    pub encoded_frames: u32,
    /// Number of distinct images stored
    pub images: usize,
    /// View box width
    pub width: u32,
    /// View box height
    pub height: u32,
    /// Frame rate after snapping
    pub fps: Fps,
    /// Layout policy used
    pub mode: EncodeMode,
}

impl EncodeReport {
    /// Space saved relative to the source frames, in percent
    pub fn compression_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.output_size as f64 / self.original_size as f64) * 100.0
    }
}

/// Loads the frames in `input`, builds a document and writes the compressed
/// SVGA file to `output`.
///
/// Nothing is written unless every step before the final write succeeds.
pub fn convert_directory(input: &Path, output: &Path, config: &EncoderConfig) -> Result<EncodeReport> {
    config.validate()?;

    let frames = frame_loader::load_frames(input)?;
    let (canonical_width, canonical_height) = frames.canonical_size();
    tracing::info!(
        frames = frames.len(),
        width = canonical_width,
        height = canonical_height,
        mode = %config.mode,
        "loaded frame set"
    );

    let builder = DocumentBuilder::new(config.clone());
    let doc = builder.build(&frames)?;
    let data = svga_core::encode(&doc)?;
    svga_core::save(output, &data)?;

    Ok(EncodeReport {
        output_path: output.to_path_buf(),
        output_size: data.len(),
        original_size: frames.original_size(),
        source_frames: frames.len(),
        encoded_frames: doc.params.frame_count,
        images: doc.images.len(),
        width: doc.params.view_box_width as u32,
        height: doc.params.view_box_height as u32,
        fps: doc.params.fps,
        mode: config.mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_frames;
    use crate::Error;

    fn numbered(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("clip_frame_{i:04}.png")).collect()
    }

    #[test]
    fn test_convert_single() {
        let input = tempfile::tempdir().unwrap();
        let names = numbered(5);
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        write_frames(input.path(), &names, 64, 64);
        let output = input.path().join("out.svga");

        let report = convert_directory(input.path(), &output, &EncoderConfig::default()).unwrap();

        assert_eq!(report.source_frames, 5);
        assert_eq!(report.encoded_frames, 5);
        assert_eq!(report.images, 1);
        assert_eq!((report.width, report.height), (64, 64));
        assert!(report.output_size < report.original_size);
        assert!(report.compression_ratio() > 0.0);

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(bytes.len(), report.output_size);
        let doc = svga_core::decode(&bytes).unwrap();
        assert_eq!(doc.sprites.len(), 1);
        assert_eq!(doc.sprites[0].image_key, "clip_frame_0000");
        assert!(doc.sprites[0].frames.iter().all(|f| f.alpha == 1.0));
    }

    #[test]
    fn test_convert_multi() {
        let input = tempfile::tempdir().unwrap();
        let names = numbered(20);
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        write_frames(input.path(), &names, 16, 16);
        let output_dir = tempfile::tempdir().unwrap();
        let output = output_dir.path().join("multi.svga");

        let config = EncoderConfig {
            mode: EncodeMode::Multi,
            max_frames: 10,
            fps: 12,
            ..EncoderConfig::default()
        };
        let report = convert_directory(input.path(), &output, &config).unwrap();

        assert_eq!(report.source_frames, 20);
        assert_eq!(report.encoded_frames, 10);
        assert_eq!(report.fps.get(), 12);

        let doc = svga_core::decode(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(doc.images.len(), 10);
        assert!(doc.images.contains_key("clip_frame_0019"));
        for (position, sprite) in doc.sprites.iter().enumerate() {
            assert_eq!(sprite.visible_positions(), vec![position]);
        }
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.svga");

        let result = convert_directory(&dir.path().join("missing"), &output, &EncoderConfig::default());

        assert!(matches!(result, Err(Error::InputNotFound(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let input = tempfile::tempdir().unwrap();
        let output = input.path().join("out.svga");

        let result = convert_directory(input.path(), &output, &EncoderConfig::default());

        assert!(matches!(result, Err(Error::NoFrames(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_compression_ratio() {
        let report = EncodeReport {
            output_path: PathBuf::from("x.svga"),
            output_size: 25,
            original_size: 100,
            source_frames: 1,
            encoded_frames: 1,
            images: 1,
            width: 1,
            height: 1,
            fps: Fps::default(),
            mode: EncodeMode::Single,
        };
        assert_eq!(report.compression_ratio(), 75.0);
    }
}
