//! Screen-to-photo coordinate mapping.
//!
//! The capture screen shows the photo stretched over the whole screen, with a
//! header of `vertical_offset` pixels drawn on top. The crop box is stored
//! relative to the area below that header, so mapping it back onto the photo
//! adds the offset before scaling.
//!
//! Scaling is per axis (`photo / screen`), and every output value is rounded
//! half away from zero.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CropRectangle;

/// Errors from coordinate mapping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    /// The rectangle or the screen/photo sizes do not describe a usable region.
    #[error("Invalid crop region: {0}")]
    InvalidCropRegion(String),
}

/// Display dimensions of the capture screen, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

impl ScreenSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// True pixel dimensions of a captured photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSize {
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl PhotoSize {
    pub fn new(pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            pixel_width,
            pixel_height,
        }
    }
}

/// Crop region in photo pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelCropSpec {
    pub origin_x: u32,
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelCropSpec {
    pub fn new(origin_x: u32, origin_y: u32, width: u32, height: u32) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }
}

/// Convert a screen-space crop rectangle to photo pixel coordinates.
///
/// # Arguments
///
/// * `rect` - Crop rectangle relative to the area below the header
/// * `screen` - Screen dimensions the photo is displayed over
/// * `photo` - Pixel dimensions of the captured photo
/// * `vertical_offset` - Header height in screen pixels
///
/// # Errors
///
/// Returns `MappingError::InvalidCropRegion` when the screen or photo has a
/// zero dimension, when any input is not finite, or when the rounded width or
/// height is not positive. A rectangle reaching past the photo's top or left
/// edge is clipped there, keeping its right and bottom edges; if nothing is
/// left after clipping the region is invalid.
pub fn to_pixel_crop(
    rect: &CropRectangle,
    screen: ScreenSize,
    photo: PhotoSize,
    vertical_offset: f64,
) -> Result<PixelCropSpec, MappingError> {
    if !screen.is_valid() {
        return Err(MappingError::InvalidCropRegion(format!(
            "screen size {}x{} must be positive",
            screen.width, screen.height
        )));
    }
    if photo.pixel_width == 0 || photo.pixel_height == 0 {
        return Err(MappingError::InvalidCropRegion(format!(
            "photo size {}x{} must be non-zero",
            photo.pixel_width, photo.pixel_height
        )));
    }

    let scale_x = photo.pixel_width as f64 / screen.width;
    let scale_y = photo.pixel_height as f64 / screen.height;

    let mut origin_x = (rect.x * scale_x).round();
    let mut origin_y = ((rect.y + vertical_offset) * scale_y).round();
    let mut width = (rect.width * scale_x).round();
    let mut height = (rect.height * scale_y).round();

    if ![origin_x, origin_y, width, height].iter().all(|v| v.is_finite()) {
        return Err(MappingError::InvalidCropRegion(
            "crop rectangle has non-finite coordinates".to_string(),
        ));
    }
    if width <= 0.0 || height <= 0.0 {
        return Err(MappingError::InvalidCropRegion(format!(
            "mapped size {}x{} must be positive",
            width, height
        )));
    }

    if origin_x < 0.0 {
        width += origin_x;
        origin_x = 0.0;
    }
    if origin_y < 0.0 {
        height += origin_y;
        origin_y = 0.0;
    }
    if width <= 0.0 || height <= 0.0 {
        return Err(MappingError::InvalidCropRegion(format!(
            "crop rectangle lies above or left of the photo ({} x {} left after clipping)",
            width, height
        )));
    }

    let spec = PixelCropSpec {
        origin_x: to_pixel(origin_x),
        origin_y: to_pixel(origin_y),
        width: to_pixel(width),
        height: to_pixel(height),
    };

    log::debug!(
        "mapped crop {:?} on {}x{} screen to {:?} on {}x{} photo",
        rect,
        screen.width,
        screen.height,
        spec,
        photo.pixel_width,
        photo.pixel_height
    );

    Ok(spec)
}

/// Saturating conversion of an already-rounded value.
fn to_pixel(value: f64) -> u32 {
    value.clamp(0.0, u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let rect = CropRectangle::new(10.4, 20.6, 150.5, 120.49);
        let spec = to_pixel_crop(
            &rect,
            ScreenSize::new(400.0, 800.0),
            PhotoSize::new(400, 800),
            0.0,
        )
        .unwrap();
        assert_eq!(spec, PixelCropSpec::new(10, 21, 151, 120));
    }

    #[test]
    fn test_scaled_mapping_with_offset() {
        // 3x horizontal, 4x vertical
        let rect = CropRectangle::new(40.0, 160.0, 320.0, 280.0);
        let spec = to_pixel_crop(
            &rect,
            ScreenSize::new(400.0, 800.0),
            PhotoSize::new(1200, 3200),
            100.0,
        )
        .unwrap();
        assert_eq!(spec, PixelCropSpec::new(120, 1040, 960, 1120));
    }

    #[test]
    fn test_negative_origin_is_clipped() {
        let rect = CropRectangle::new(-20.0, -150.0, 200.0, 200.0);
        let spec = to_pixel_crop(
            &rect,
            ScreenSize::new(400.0, 800.0),
            PhotoSize::new(400, 800),
            100.0,
        )
        .unwrap();
        // Right edge stays at 180, bottom edge at -150 + 100 + 200 = 150
        assert_eq!(spec, PixelCropSpec::new(0, 0, 180, 150));
    }

    #[test]
    fn test_clipping_keeps_far_edges_when_scaled() {
        // 2x both axes; top edge 30 screen pixels above the photo
        let rect = CropRectangle::new(-10.0, -130.0, 110.0, 100.0);
        let spec = to_pixel_crop(
            &rect,
            ScreenSize::new(400.0, 800.0),
            PhotoSize::new(800, 1600),
            100.0,
        )
        .unwrap();
        assert_eq!(spec, PixelCropSpec::new(0, 0, 200, 140));
    }

    #[test]
    fn test_fully_above_photo_is_invalid() {
        let rect = CropRectangle::new(0.0, -300.0, 100.0, 150.0);
        let result = to_pixel_crop(
            &rect,
            ScreenSize::new(400.0, 800.0),
            PhotoSize::new(400, 800),
            100.0,
        );
        assert!(matches!(result, Err(MappingError::InvalidCropRegion(_))));

        let rect = CropRectangle::new(-150.0, 0.0, 150.0, 100.0);
        let result = to_pixel_crop(
            &rect,
            ScreenSize::new(400.0, 800.0),
            PhotoSize::new(400, 800),
            0.0,
        );
        assert!(matches!(result, Err(MappingError::InvalidCropRegion(_))));
    }

    #[test]
    fn test_rounds_to_zero_width_is_invalid() {
        let rect = CropRectangle::new(0.0, 0.0, 0.4, 100.0);
        let result = to_pixel_crop(
            &rect,
            ScreenSize::new(400.0, 800.0),
            PhotoSize::new(400, 800),
            0.0,
        );
        assert!(matches!(result, Err(MappingError::InvalidCropRegion(_))));
    }

    #[test]
    fn test_negative_height_is_invalid() {
        let rect = CropRectangle::new(0.0, 0.0, 100.0, -50.0);
        let result = to_pixel_crop(
            &rect,
            ScreenSize::new(400.0, 800.0),
            PhotoSize::new(400, 800),
            0.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_screen_is_invalid() {
        let rect = CropRectangle::new(0.0, 0.0, 100.0, 100.0);
        let result = to_pixel_crop(&rect, ScreenSize::new(0.0, 800.0), PhotoSize::new(400, 800), 0.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_photo_is_invalid() {
        let rect = CropRectangle::new(0.0, 0.0, 100.0, 100.0);
        let result = to_pixel_crop(&rect, ScreenSize::new(400.0, 800.0), PhotoSize::new(0, 800), 0.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_rect_is_invalid() {
        let rect = CropRectangle::new(f64::INFINITY, 0.0, 100.0, 100.0);
        let result = to_pixel_crop(
            &rect,
            ScreenSize::new(400.0, 800.0),
            PhotoSize::new(400, 800),
            0.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        let rect = CropRectangle::new(0.5, 1.5, 100.5, 100.5);
        let spec = to_pixel_crop(
            &rect,
            ScreenSize::new(400.0, 800.0),
            PhotoSize::new(400, 800),
            0.0,
        )
        .unwrap();
        assert_eq!(spec, PixelCropSpec::new(1, 2, 101, 101));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
