//! Photo buffers, metadata and decode errors.

use image::metadata::Orientation;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a captured photo.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are empty or not a known image container.
    #[error("Unsupported photo format")]
    InvalidFormat,

    /// The container was recognised but the data could not be read.
    #[error("Photo data is corrupted: {0}")]
    CorruptedFile(String),

    /// A requested output size has a zero dimension.
    #[error("Cannot produce a {width}x{height} image")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Resampling kernel used when a crop is downscaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resampling {
    Nearest,
    Triangle,
    /// Keeps thin pen strokes legible after downscaling.
    #[default]
    Lanczos3,
}

impl From<Resampling> for image::imageops::FilterType {
    fn from(kernel: Resampling) -> Self {
        match kernel {
            Resampling::Nearest => image::imageops::FilterType::Nearest,
            Resampling::Triangle => image::imageops::FilterType::Triangle,
            Resampling::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Stored size and EXIF orientation of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoMetadata {
    /// Width as stored by the sensor.
    pub width: u32,
    /// Height as stored by the sensor.
    pub height: u32,
    pub orientation: Orientation,
}

impl PhotoMetadata {
    /// True when showing the photo upright turns it by a quarter.
    pub fn is_quarter_turned(&self) -> bool {
        matches!(
            self.orientation,
            Orientation::Rotate90
                | Orientation::Rotate270
                | Orientation::Rotate90FlipH
                | Orientation::Rotate270FlipH
        )
    }

    /// `(width, height)` of the upright photo.
    pub fn upright_dimensions(&self) -> (u32, u32) {
        if self.is_quarter_turned() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// Upright RGB8 photo, row-major, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Copy into an `image` buffer; `None` if the buffer length is inconsistent.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

impl From<RgbImage> for DecodedImage {
    fn from(buffer: RgbImage) -> Self {
        let (width, height) = buffer.dimensions();
        Self::new(width, height, buffer.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upright_dimensions_for_portrait_shot() {
        let meta = PhotoMetadata {
            width: 4032,
            height: 3024,
            orientation: Orientation::Rotate90,
        };
        assert!(meta.is_quarter_turned());
        assert_eq!(meta.upright_dimensions(), (3024, 4032));
    }

    #[test]
    fn test_upright_dimensions_unrotated() {
        for orientation in [
            Orientation::NoTransforms,
            Orientation::Rotate180,
            Orientation::FlipHorizontal,
            Orientation::FlipVertical,
        ] {
            let meta = PhotoMetadata {
                width: 640,
                height: 480,
                orientation,
            };
            assert_eq!(meta.upright_dimensions(), (640, 480));
        }
    }

    #[test]
    fn test_rgb_image_conversion() {
        let mut buffer = RgbImage::new(3, 2);
        buffer.put_pixel(2, 1, image::Rgb([10, 20, 30]));

        let decoded = DecodedImage::from(buffer);
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(&decoded.pixels[15..18], &[10, 20, 30]);

        let back = decoded.to_rgb_image().unwrap();
        assert_eq!(back.get_pixel(2, 1).0, [10, 20, 30]);
    }

    #[test]
    fn test_resampling_defaults_to_lanczos() {
        assert_eq!(
            image::imageops::FilterType::from(Resampling::default()),
            image::imageops::FilterType::Lanczos3
        );
        let parsed: Resampling = serde_json::from_str("\"triangle\"").unwrap();
        assert_eq!(parsed, Resampling::Triangle);
    }
}
