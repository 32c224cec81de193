//! Text encoding of prepared JPEGs for the inference request body.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::EncodeError;

/// A prepared crop as base64 text, ready to embed in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Standard-alphabet, padded base64 of the JPEG bytes.
    pub data: String,
    /// Width of the encoded image in pixels.
    pub width: u32,
    /// Height of the encoded image in pixels.
    pub height: u32,
}

impl EncodedImage {
    /// Wrap JPEG bytes.
    pub fn from_jpeg(jpeg: &[u8], width: u32, height: u32) -> Self {
        Self {
            data: BASE64.encode(jpeg),
            width,
            height,
        }
    }

    /// Length of the base64 text in characters.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `data:` URI for an `image_url` message part.
    pub fn data_uri(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.data)
    }

    /// Decode back to JPEG bytes.
    pub fn to_jpeg(&self) -> Result<Vec<u8>, EncodeError> {
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| EncodeError::InvalidPayload(e.to_string()))
    }
}
