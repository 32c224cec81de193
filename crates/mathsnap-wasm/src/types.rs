//! WASM-compatible wrapper types for crop geometry and prepared images.

use std::fmt::Display;

use mathsnap_core::encode::EncodedImage;
use mathsnap_core::geometry::{CornerHandle, CropRectangle, PixelCropSpec};
use wasm_bindgen::prelude::*;

/// Crop rectangle in screen coordinates.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl JsCropRect {
    #[wasm_bindgen(constructor)]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> JsCropRect {
        JsCropRect {
            x,
            y,
            width,
            height,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Top edge as drawn on screen, below a header of `vertical_offset` pixels.
    pub fn screen_top(&self, vertical_offset: f64) -> f64 {
        self.to_core().screen_top(vertical_offset)
    }
}

impl JsCropRect {
    pub(crate) fn from_core(rect: CropRectangle) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }

    pub(crate) fn to_core(self) -> CropRectangle {
        CropRectangle::new(self.x, self.y, self.width, self.height)
    }
}

/// Crop region in photo pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsPixelCrop {
    origin_x: u32,
    origin_y: u32,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsPixelCrop {
    #[wasm_bindgen(constructor)]
    pub fn new(origin_x: u32, origin_y: u32, width: u32, height: u32) -> JsPixelCrop {
        JsPixelCrop {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn origin_x(&self) -> u32 {
        self.origin_x
    }

    #[wasm_bindgen(getter)]
    pub fn origin_y(&self) -> u32 {
        self.origin_y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl JsPixelCrop {
    pub(crate) fn from_core(spec: PixelCropSpec) -> Self {
        Self::new(spec.origin_x, spec.origin_y, spec.width, spec.height)
    }

    pub(crate) fn to_core(self) -> PixelCropSpec {
        PixelCropSpec::new(self.origin_x, self.origin_y, self.width, self.height)
    }
}

/// A prepared crop ready to embed in an inference request.
#[wasm_bindgen]
pub struct JsPreparedImage {
    inner: EncodedImage,
}

#[wasm_bindgen]
impl JsPreparedImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Base64 JPEG text.
    #[wasm_bindgen(getter)]
    pub fn base64(&self) -> String {
        self.inner.data.clone()
    }

    /// `data:image/jpeg;base64,...` URI for an `image_url` message part.
    pub fn data_uri(&self) -> String {
        self.inner.data_uri()
    }

    /// Length of the base64 text in characters.
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }
}

impl JsPreparedImage {
    pub(crate) fn from_encoded(inner: EncodedImage) -> Self {
        Self { inner }
    }

    pub(crate) fn encoded(&self) -> &EncodedImage {
        &self.inner
    }
}

/// Convert a u8 corner value to the core CornerHandle enum.
///
/// Values:
/// - 0 = TopLeft
/// - 1 = TopRight
/// - 2 = BottomLeft
/// - 3 = BottomRight
pub(crate) fn corner_from_u8(value: u8) -> Option<CornerHandle> {
    match value {
        0 => Some(CornerHandle::TopLeft),
        1 => Some(CornerHandle::TopRight),
        2 => Some(CornerHandle::BottomLeft),
        3 => Some(CornerHandle::BottomRight),
        _ => None,
    }
}

/// Build a JS `Error` carrying `err`'s message.
pub(crate) fn js_error(err: impl Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
