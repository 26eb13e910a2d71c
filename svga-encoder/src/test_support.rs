//! In-memory PNG fixtures shared by the unit tests

use crate::{FrameSet, SourceFrame};
use image::{ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

/// Encodes a PNG whose pixels form a gradient tinted by `seed`
pub fn rgba_png(width: u32, height: u32, seed: u8) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, seed, 255])
    });
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .unwrap();
    buf
}

/// Encodes an opaque RGB PNG
pub fn rgb_png(width: u32, height: u32, seed: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, seed, (y % 256) as u8]));
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Writes `names` as `width` x `height` PNGs into `dir`
pub fn write_frames(dir: &Path, names: &[&str], width: u32, height: u32) {
    for (i, name) in names.iter().enumerate() {
        std::fs::write(dir.join(name), rgba_png(width, height, i as u8)).unwrap();
    }
}

/// Builds an in-memory frame set of `count` distinct `width` x `height` frames
pub fn frame_set(count: usize, width: u32, height: u32) -> FrameSet {
    let frames = (0..count)
        .map(|i| SourceFrame {
            key: format!("anim_frame_{i:04}"),
            index: i as u64,
            data: rgba_png(width, height, i as u8),
            width,
            height,
        })
        .collect();
    FrameSet::new(frames).unwrap()
}
