//! JPEG encoding of prepared crops.
//!
//! The inference API accepts JPEG data URIs; lossy compression keeps the
//! request small while leaving handwriting readable at the default quality.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use thiserror::Error;

use crate::decode::DecodedImage;

#[derive(Debug, Error)]
pub enum EncodeError {
    /// The buffer length is not `width * height * 3`.
    #[error("RGB buffer of {len} bytes does not fit a {width}x{height} image")]
    BufferMismatch { width: u32, height: u32, len: usize },

    #[error("Cannot encode an image with a zero dimension ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("JPEG encoder failed: {0}")]
    Jpeg(#[from] image::ImageError),

    /// Text payload is not valid base64.
    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// Encode an RGB8 buffer as a baseline JPEG.
///
/// `quality` is clamped to 1-100.
pub fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::EmptyImage { width, height });
    }
    if pixels.len() != width as usize * height as usize * 3 {
        return Err(EncodeError::BufferMismatch {
            width,
            height,
            len: pixels.len(),
        });
    }

    let mut out = Vec::with_capacity(pixels.len() / 8);
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode(
        pixels,
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}

/// Encode a decoded image.
pub fn encode_image(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    encode_jpeg(&image.pixels, image.width, image.height, quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripes(width: u32, height: u32) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| {
                let v = if (i % width) / 4 % 2 == 0 { 20 } else { 235 };
                [v, v, v]
            })
            .collect()
    }

    #[test]
    fn test_output_is_complete_jpeg() {
        let jpeg = encode_jpeg(&stripes(64, 32), 64, 32, 90).unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let pixels = stripes(128, 128);
        let high = encode_jpeg(&pixels, 128, 128, 95).unwrap();
        let low = encode_jpeg(&pixels, 128, 128, 10).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_out_of_range_quality_is_clamped() {
        let pixels = stripes(8, 8);
        assert!(encode_jpeg(&pixels, 8, 8, 0).is_ok());
        assert!(encode_jpeg(&pixels, 8, 8, u8::MAX).is_ok());
    }

    #[test]
    fn test_buffer_mismatch() {
        assert!(matches!(
            encode_jpeg(&[0u8; 10], 2, 2, 90),
            Err(EncodeError::BufferMismatch { width: 2, height: 2, len: 10 })
        ));
    }

    #[test]
    fn test_zero_dimension() {
        assert!(matches!(
            encode_jpeg(&[], 0, 4, 90),
            Err(EncodeError::EmptyImage { .. })
        ));
    }

    #[test]
    fn test_encode_image() {
        let image = DecodedImage::new(16, 8, stripes(16, 8));
        let jpeg = encode_image(&image, 80).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Any well-sized buffer encodes and decodes back to the same size.
        #[test]
        fn prop_encoded_size_matches(
            (width, height) in (1u32..=48, 1u32..=48),
            quality in 1u8..=100,
            shade in any::<u8>(),
        ) {
            let pixels = vec![shade; (width * height * 3) as usize];
            let jpeg = encode_jpeg(&pixels, width, height, quality).unwrap();
            let decoded = image::load_from_memory(&jpeg).unwrap();
            prop_assert_eq!((decoded.width(), decoded.height()), (width, height));
        }
    }
}
