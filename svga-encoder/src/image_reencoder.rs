//! PNG re-encoding for frames stored in multi-frame documents

use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError};

/// Longest side allowed for a stored image; larger images are scaled down
pub const MAX_DIMENSION: u32 = 1080;

/// Why a frame could not be re-encoded
#[derive(Debug, thiserror::Error)]
pub enum ReencodeError {
    #[error("decode failed: {0}")]
    Decode(#[source] ImageError),

    #[error("PNG encode failed: {0}")]
    Encode(#[source] ImageError),

    #[error("re-encoded output failed to decode: {0}")]
    Verify(#[source] ImageError),

    #[error("degenerate image size {width}x{height}")]
    Degenerate { width: u32, height: u32 },
}

/// Encodes an image as PNG with moderate compression effort
pub(crate) fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Default, PngFilterType::Adaptive);
    image.write_with_encoder(encoder)?;
    Ok(buf)
}

fn check_dimensions(width: u32, height: u32) -> Result<(), ReencodeError> {
    if width == 0 || height == 0 {
        return Err(ReencodeError::Degenerate { width, height });
    }
    Ok(())
}

/// Re-encodes an image as PNG, scaling it to fit within [`MAX_DIMENSION`].
///
/// Images with an alpha channel keep their color type, everything else is
/// stored as 8-bit RGB. The output is decoded again before being returned;
/// any failure along the way is reported as an error so the caller can keep
/// the original bytes.
pub fn reencode(data: &[u8]) -> Result<Vec<u8>, ReencodeError> {
    let mut image = image::load_from_memory(data).map_err(ReencodeError::Decode)?;

    if image.width() > MAX_DIMENSION || image.height() > MAX_DIMENSION {
        // resize() keeps the aspect ratio and fits inside the bounds
        image = image.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3);
    }
    check_dimensions(image.width(), image.height())?;

    let image = if matches!(image, DynamicImage::ImageRgb8(_)) || image.color().has_alpha() {
        image
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };

    let encoded = encode_png(&image).map_err(ReencodeError::Encode)?;

    let check = image::load_from_memory(&encoded).map_err(ReencodeError::Verify)?;
    check_dimensions(check.width(), check.height())?;

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{rgb_png, rgba_png};
    use image::{ColorType, GrayImage, ImageEncoder, Luma};

    #[test]
    fn test_garbage_is_rejected() {
        let garbage = b"\x89PNG but not really".to_vec();
        assert!(matches!(reencode(&garbage), Err(ReencodeError::Decode(_))));
        assert!(matches!(reencode(&[]), Err(ReencodeError::Decode(_))));
    }

    #[test]
    fn test_oversized_image_is_scaled_down() {
        let png = rgba_png(1600, 1200, 7);

        let out = reencode(&png).unwrap();

        let decoded = image::load_from_memory(&out).unwrap();
        assert!(decoded.width() <= MAX_DIMENSION);
        assert!(decoded.height() <= MAX_DIMENSION);
        assert_eq!((decoded.width(), decoded.height()), (1080, 810));
    }

    #[test]
    fn test_small_image_keeps_size() {
        let png = rgb_png(40, 20, 3);
        let out = reencode(&png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 20));
        assert_eq!(decoded.color(), ColorType::Rgb8);
    }

    #[test]
    fn test_alpha_is_preserved() {
        let png = rgba_png(12, 12, 200);
        let out = reencode(&png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert!(decoded.color().has_alpha());
        assert_eq!(decoded.to_rgba8(), image::load_from_memory(&png).unwrap().to_rgba8());
    }

    #[test]
    fn test_grayscale_becomes_rgb() {
        let gray = GrayImage::from_fn(9, 4, |x, _| Luma([(x * 20) as u8]));
        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png)
            .write_image(gray.as_raw(), 9, 4, image::ExtendedColorType::L8)
            .unwrap();

        let out = reencode(&png).unwrap();
        assert_eq!(image::load_from_memory(&out).unwrap().color(), ColorType::Rgb8);
    }

    #[test]
    fn test_degenerate_dimensions() {
        assert!(matches!(
            check_dimensions(0, 10),
            Err(ReencodeError::Degenerate { width: 0, height: 10 })
        ));
        assert!(check_dimensions(1, 1).is_ok());
    }
}
