//! Encoding of prepared crops for upload.
//!
//! - [`encode_jpeg`] / [`encode_image`] - RGB pixels to JPEG bytes
//! - [`EncodedImage`] - JPEG bytes as base64 text and a `data:` URI

mod jpeg;
mod payload;

pub use jpeg::{encode_image, encode_jpeg, EncodeError};
pub use payload::EncodedImage;
