//! Pixel-space cropping of decoded photos.
//!
//! Crop specs come from the screen mapping, which rounds independently on
//! each axis and can overhang the photo by a pixel or extend past it when the
//! crop box was dragged outside the photo area. The region is therefore
//! clamped to the image bounds; only a region with no overlap is rejected.

use crate::decode::DecodedImage;
use crate::geometry::{MappingError, PixelCropSpec};

/// Copy the region described by `spec` out of `image`.
///
/// # Errors
///
/// Returns `MappingError::InvalidCropRegion` if the crop spec has a zero dimension
/// or does not overlap the image at all.
pub fn crop_to_spec(image: &DecodedImage, spec: &PixelCropSpec) -> Result<DecodedImage, MappingError> {
    if spec.width == 0 || spec.height == 0 {
        return Err(MappingError::InvalidCropRegion(format!(
            "crop size {}x{} must be non-zero",
            spec.width, spec.height
        )));
    }
    if spec.origin_x >= image.width || spec.origin_y >= image.height {
        return Err(MappingError::InvalidCropRegion(format!(
            "crop origin ({}, {}) lies outside the {}x{} photo",
            spec.origin_x, spec.origin_y, image.width, image.height
        )));
    }

    let right = spec.origin_x.saturating_add(spec.width).min(image.width);
    let bottom = spec.origin_y.saturating_add(spec.height).min(image.height);
    let out_width = right - spec.origin_x;
    let out_height = bottom - spec.origin_y;

    // Fast path: full-frame crop
    if out_width == image.width && out_height == image.height {
        return Ok(image.clone());
    }

    let src_stride = image.width as usize * 3;
    let row_len = out_width as usize * 3;
    let mut output = Vec::with_capacity(row_len * out_height as usize);

    for y in spec.origin_y..bottom {
        let start = y as usize * src_stride + spec.origin_x as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(out_width, out_height, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(100, 100);
        let result = crop_to_spec(&img, &PixelCropSpec::new(0, 0, 100, 100)).unwrap();
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_center_crop_pixels() {
        let img = test_image(10, 10);
        let result = crop_to_spec(&img, &PixelCropSpec::new(2, 3, 4, 5)).unwrap();
        assert_eq!((result.width, result.height), (4, 5));
        // (2, 3) -> 3 * 10 + 2
        assert_eq!(result.pixels[0], 32);
        // Last pixel is (5, 7) -> 75
        assert_eq!(result.pixels[result.pixels.len() - 1], 75);
    }

    #[test]
    fn test_overhang_clamps_to_bounds() {
        let img = test_image(10, 10);
        let result = crop_to_spec(&img, &PixelCropSpec::new(8, 6, 5, 50)).unwrap();
        assert_eq!((result.width, result.height), (2, 4));
    }

    #[test]
    fn test_origin_outside_is_invalid() {
        let img = test_image(10, 10);
        assert!(crop_to_spec(&img, &PixelCropSpec::new(10, 0, 5, 5)).is_err());
        assert!(crop_to_spec(&img, &PixelCropSpec::new(0, 12, 5, 5)).is_err());
    }

    #[test]
    fn test_zero_size_is_invalid() {
        let img = test_image(10, 10);
        assert!(crop_to_spec(&img, &PixelCropSpec::new(0, 0, 0, 5)).is_err());
    }

    #[test]
    fn test_huge_spec_saturates() {
        let img = test_image(10, 10);
        let result = crop_to_spec(&img, &PixelCropSpec::new(1, 1, u32::MAX, u32::MAX)).unwrap();
        assert_eq!((result.width, result.height), (9, 9));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    proptest! {
        /// Property: Output is bounded by both the crop spec and the image.
        #[test]
        fn prop_output_bounded(
            (width, height) in (4u32..=60, 4u32..=60),
            (ox, oy) in (0u32..60, 0u32..60),
            (cw, ch) in (1u32..=80, 1u32..=80),
        ) {
            let img = create_test_image(width, height);
            let spec = PixelCropSpec::new(ox, oy, cw, ch);
            match crop_to_spec(&img, &spec) {
                Ok(result) => {
                    prop_assert!(result.width >= 1 && result.height >= 1);
                    prop_assert!(result.width <= cw && result.height <= ch);
                    prop_assert!(ox + result.width <= width);
                    prop_assert!(oy + result.height <= height);
                    prop_assert_eq!(result.pixels.len(), (result.width * result.height * 3) as usize);
                }
                Err(_) => prop_assert!(ox >= width || oy >= height),
            }
        }

        /// Property: Each cropped pixel equals the source pixel at the offset position.
        #[test]
        fn prop_pixels_come_from_offset_position(
            (width, height) in (10u32..=40, 10u32..=40),
            (ox, oy) in (0u32..10, 0u32..10),
        ) {
            let img = create_test_image(width, height);
            let result = crop_to_spec(&img, &PixelCropSpec::new(ox, oy, 5, 5)).unwrap();
            for y in 0..result.height {
                for x in 0..result.width {
                    let src = (((oy + y) * width + (ox + x)) % 256) as u8;
                    prop_assert_eq!(result.pixels[((y * result.width + x) * 3) as usize], src);
                }
            }
        }
    }
}
