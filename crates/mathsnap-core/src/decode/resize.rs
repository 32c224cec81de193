//! Width-limited downscaling of cropped photos.

use image::imageops;

use super::{DecodeError, DecodedImage, Resampling};

/// Downscale `image` to `max_width` when it is wider, keeping the aspect
/// ratio. Narrower images come back unchanged; nothing is upscaled.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` for a zero `max_width`, and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the size.
pub fn fit_width(
    image: &DecodedImage,
    max_width: u32,
    kernel: Resampling,
) -> Result<DecodedImage, DecodeError> {
    if max_width == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: 0,
            height: image.height,
        });
    }
    if image.width <= max_width {
        return Ok(image.clone());
    }

    let height = scaled_height(image.width, image.height, max_width);
    log::debug!(
        "downscaling {}x{} crop to {}x{}",
        image.width,
        image.height,
        max_width,
        height
    );

    let buffer = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("pixel buffer does not match size".to_string()))?;
    Ok(imageops::resize(&buffer, max_width, height, kernel.into()).into())
}

/// Height matching `target_width` at the original aspect ratio, at least 1.
fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = (u64::from(height) * u64::from(target_width) + u64::from(width) / 2) / u64::from(width);
    scaled.clamp(1, u64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> DecodedImage {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| if (x + y) % 2 == 0 { 255u8 } else { 0 }))
            .flat_map(|v| [v, v, v])
            .collect();
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_wide_crop_downscaled() {
        let out = fit_width(&checkerboard(3000, 1000), 1200, Resampling::Lanczos3).unwrap();
        assert_eq!((out.width, out.height), (1200, 400));
        assert_eq!(out.pixels.len(), 1200 * 400 * 3);
    }

    #[test]
    fn test_tall_crop_limited_by_width_only() {
        let out = fit_width(&checkerboard(1500, 3000), 1200, Resampling::Triangle).unwrap();
        assert_eq!((out.width, out.height), (1200, 2400));
    }

    #[test]
    fn test_narrow_crop_unchanged() {
        let input = checkerboard(800, 2000);
        let out = fit_width(&input, 1200, Resampling::Nearest).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_exact_width_unchanged() {
        let input = checkerboard(1200, 10);
        assert_eq!(fit_width(&input, 1200, Resampling::default()).unwrap(), input);
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(matches!(
            fit_width(&checkerboard(10, 10), 0, Resampling::default()),
            Err(DecodeError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_scaled_height_rounds_and_floors_at_one() {
        assert_eq!(scaled_height(4032, 1000, 1200), 298);
        assert_eq!(scaled_height(5000, 1, 1200), 1);
        assert_eq!(scaled_height(3, 2, 2), 1);
    }
}
