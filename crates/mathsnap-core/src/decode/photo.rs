//! Camera photo decoding with EXIF orientation handling.
//!
//! Phone cameras usually store the sensor image unrotated and record the
//! rotation in the EXIF orientation tag. The capture screen displays the
//! upright photo, so both decoding and size queries apply the tag; otherwise
//! the crop box would map onto the wrong region of a portrait shot.

use std::io::Cursor;

use exif::{In, Tag};
use image::metadata::Orientation;
use image::ImageReader;

use super::{DecodeError, DecodedImage, PhotoMetadata};
use crate::geometry::PhotoSize;

/// Decode a photo and turn it upright.
pub fn decode_photo(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = exif_orientation(bytes);
    let mut photo = reader(bytes)?
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    photo.apply_orientation(orientation);

    let rgb = photo.into_rgb8();
    log::debug!(
        "decoded {}x{} photo, orientation {:?}",
        rgb.width(),
        rgb.height(),
        orientation
    );
    Ok(DecodedImage::from(rgb))
}

/// Stored size and orientation, read from the headers only.
pub fn read_metadata(bytes: &[u8]) -> Result<PhotoMetadata, DecodeError> {
    let (width, height) = reader(bytes)?
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    Ok(PhotoMetadata {
        width,
        height,
        orientation: exif_orientation(bytes),
    })
}

/// Pixel size of the upright photo.
pub fn photo_size(bytes: &[u8]) -> Result<PhotoSize, DecodeError> {
    let (width, height) = read_metadata(bytes)?.upright_dimensions();
    Ok(PhotoSize::new(width, height))
}

fn reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    match reader.format() {
        Some(_) => Ok(reader),
        None => Err(DecodeError::InvalidFormat),
    }
}

/// Orientation tag of the primary image; photos without EXIF are upright.
fn exif_orientation(bytes: &[u8]) -> Orientation {
    let Ok(exif) = exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) else {
        return Orientation::NoTransforms;
    };
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .and_then(|value| u8::try_from(value).ok())
        .and_then(Orientation::from_exif)
        .unwrap_or(Orientation::NoTransforms)
}
