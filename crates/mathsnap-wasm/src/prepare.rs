//! Coordinate mapping and image preparation bindings.
//!
//! On confirm the front end maps the session's crop box into photo pixels,
//! then prepares the photo bytes into a base64 JPEG for the vision request.
//!
//! ```typescript
//! const [w, h] = photo_size(bytes);
//! const crop = map_session_crop(session, w, h);
//! const image = prepare_image(bytes, crop);
//! body.messages[1].content.push({ type: 'image_url', image_url: { url: image.data_uri() } });
//! ```

use mathsnap_core::config::PrepareOptions;
use mathsnap_core::decode;
use mathsnap_core::geometry::{to_pixel_crop, PhotoSize, ScreenSize};
use mathsnap_core::prepare::ImagePreparer;
use wasm_bindgen::prelude::*;

use crate::session::JsCropSession;
use crate::types::{js_error, JsCropRect, JsPixelCrop, JsPreparedImage};

/// Map a screen crop rectangle into photo pixel coordinates.
///
/// # Arguments
/// * `rect` - Crop rectangle relative to the area below the header
/// * `screen_width`, `screen_height` - Screen the photo is shown over
/// * `photo_width`, `photo_height` - Pixel size of the captured photo
/// * `vertical_offset` - Header height in screen pixels
#[wasm_bindgen]
pub fn map_crop(
    rect: &JsCropRect,
    screen_width: f64,
    screen_height: f64,
    photo_width: u32,
    photo_height: u32,
    vertical_offset: f64,
) -> Result<JsPixelCrop, JsValue> {
    to_pixel_crop(
        &rect.to_core(),
        ScreenSize::new(screen_width, screen_height),
        PhotoSize::new(photo_width, photo_height),
        vertical_offset,
    )
    .map(JsPixelCrop::from_core)
    .map_err(js_error)
}

/// Map the session's current crop box, using the session's screen and offset.
#[wasm_bindgen]
pub fn map_session_crop(
    session: &JsCropSession,
    photo_width: u32,
    photo_height: u32,
) -> Result<JsPixelCrop, JsValue> {
    let core = session.core();
    to_pixel_crop(
        &core.rect(),
        core.screen(),
        PhotoSize::new(photo_width, photo_height),
        core.layout().vertical_offset,
    )
    .map(JsPixelCrop::from_core)
    .map_err(js_error)
}

/// Pixel size of an encoded photo with EXIF orientation applied, as `[w, h]`.
#[wasm_bindgen]
pub fn photo_size(bytes: &[u8]) -> Result<Vec<u32>, JsValue> {
    decode::photo_size(bytes)
        .map(|size| vec![size.pixel_width, size.pixel_height])
        .map_err(js_error)
}

/// Crop, downscale and encode a photo for the vision request.
///
/// Omitted options take their defaults: `max_width` 1200, `jpeg_quality` 90,
/// `min_payload_len` 1000.
///
/// # Errors
///
/// Fails when the photo cannot be decoded, the crop misses the photo, or the
/// encoded crop is below `min_payload_len` characters.
#[wasm_bindgen]
pub fn prepare_image(
    bytes: &[u8],
    crop: &JsPixelCrop,
    max_width: Option<u32>,
    jpeg_quality: Option<u8>,
    min_payload_len: Option<usize>,
) -> Result<JsPreparedImage, JsValue> {
    let options = prepare_options(max_width, jpeg_quality, min_payload_len);
    ImagePreparer::new(options)
        .prepare(bytes, &crop.to_core())
        .map(JsPreparedImage::from_encoded)
        .map_err(js_error)
}

fn prepare_options(
    max_width: Option<u32>,
    jpeg_quality: Option<u8>,
    min_payload_len: Option<usize>,
) -> PrepareOptions {
    let defaults = PrepareOptions::default();
    PrepareOptions {
        max_width: max_width.unwrap_or(defaults.max_width),
        jpeg_quality: jpeg_quality.unwrap_or(defaults.jpeg_quality),
        min_payload_len: min_payload_len.unwrap_or(defaults.min_payload_len),
        debug_dir: None,
    }
}
