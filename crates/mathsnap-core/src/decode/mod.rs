//! Photo decoding for the capture pipeline.
//!
//! This module provides functionality for:
//! - Decoding camera photos with EXIF orientation applied
//! - Reading photo dimensions without a full decode
//! - Downscaling wide crops before upload
//!
//! # Examples
//!
//! ```ignore
//! use mathsnap_core::decode::{decode_photo, photo_size};
//!
//! let bytes = std::fs::read("photo.jpg")?;
//! let size = photo_size(&bytes)?;
//! let image = decode_photo(&bytes)?;
//! assert_eq!((image.width, image.height), (size.pixel_width, size.pixel_height));
//! ```

mod photo;
mod resize;
mod types;

pub use photo::{decode_photo, photo_size, read_metadata};
pub use resize::fit_width;
pub use types::{DecodeError, DecodedImage, PhotoMetadata, Resampling};
