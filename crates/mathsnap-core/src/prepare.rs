//! Turning a captured photo and a pixel crop into an upload payload.
//!
//! Steps, in order:
//! 1. Decode the photo with EXIF orientation applied
//! 2. Crop to the pixel spec (clamped to the photo bounds)
//! 3. Downscale to `max_width` if the crop is wider
//! 4. Encode as JPEG, then base64
//! 5. Reject payloads below `min_payload_len` characters
//!
//! The final size check is a heuristic: a near-empty crop compresses to a
//! tiny JPEG. It is not a precise bound and the threshold is configurable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::PrepareOptions;
use crate::decode::{self, DecodeError, DecodedImage, Resampling};
use crate::encode::{encode_image, EncodeError, EncodedImage};
use crate::geometry::{MappingError, PixelCropSpec};
use crate::transform::crop_to_spec;

/// File name used for the diagnostic copy of the last prepared crop.
pub const DEBUG_COPY_NAME: &str = "debug_crop.jpg";

/// Errors from image preparation.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// The pixel crop does not select any part of the photo.
    #[error("Invalid crop region: {0}")]
    InvalidCropRegion(String),

    /// The encoded payload is below the sanity threshold.
    #[error("Cropped image is too small or empty ({len} < {min} characters)")]
    ImageTooSmall { len: usize, min: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl From<MappingError> for PrepareError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::InvalidCropRegion(reason) => PrepareError::InvalidCropRegion(reason),
        }
    }
}

/// Reject payloads shorter than `min` characters.
pub fn check_payload_len(len: usize, min: usize) -> Result<(), PrepareError> {
    if len < min {
        return Err(PrepareError::ImageTooSmall { len, min });
    }
    Ok(())
}

/// Crop, downscale and encode photos for the transcription request.
#[derive(Debug, Clone, Default)]
pub struct ImagePreparer {
    options: PrepareOptions,
    kernel: Resampling,
}

impl ImagePreparer {
    pub fn new(options: PrepareOptions) -> Self {
        Self {
            options,
            kernel: Resampling::default(),
        }
    }

    /// Override the downscale kernel.
    pub fn with_resampling(mut self, kernel: Resampling) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn options(&self) -> &PrepareOptions {
        &self.options
    }

    /// Prepare encoded photo bytes as captured by the camera.
    pub fn prepare(&self, photo: &[u8], crop: &PixelCropSpec) -> Result<EncodedImage, PrepareError> {
        let image = decode::decode_photo(photo)?;
        self.prepare_decoded(&image, crop)
    }

    /// Prepare an already decoded, correctly oriented photo.
    pub fn prepare_decoded(
        &self,
        image: &DecodedImage,
        crop: &PixelCropSpec,
    ) -> Result<EncodedImage, PrepareError> {
        let cropped = crop_to_spec(image, crop)?;
        let scaled = decode::fit_width(&cropped, self.options.max_width, self.kernel)?;

        let jpeg = encode_image(&scaled, self.options.jpeg_quality)?;

        if let Some(dir) = &self.options.debug_dir {
            match write_debug_copy(&jpeg, dir) {
                Ok(path) => log::debug!("saved prepared crop to {}", path.display()),
                Err(e) => log::warn!("could not save debug crop to {}: {}", dir.display(), e),
            }
        }

        let encoded = EncodedImage::from_jpeg(&jpeg, scaled.width, scaled.height);
        log::debug!(
            "prepared {}x{} crop: {} JPEG bytes, {} base64 chars",
            scaled.width,
            scaled.height,
            jpeg.len(),
            encoded.len()
        );

        check_payload_len(encoded.len(), self.options.min_payload_len)?;
        Ok(encoded)
    }
}

/// Write `jpeg` to `dir/debug_crop.jpg`, creating the directory if needed.
pub fn write_debug_copy(jpeg: &[u8], dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(DEBUG_COPY_NAME);
    fs::write(&path, jpeg)?;
    Ok(path)
}
