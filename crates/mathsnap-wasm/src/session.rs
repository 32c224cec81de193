//! Crop session bindings for the capture screen.
//!
//! Each corner handle's gesture recogniser calls `begin_drag`, then `drag`
//! with the net translation since the gesture began, then `end_drag`. Corners
//! are passed as numbers: 0 = top-left, 1 = top-right, 2 = bottom-left,
//! 3 = bottom-right.
//!
//! ```typescript
//! const session = new JsCropSession(window.innerWidth, window.innerHeight, 100);
//! handle.onStart(() => session.begin_drag(3));
//! handle.onMove((e) => draw(session.drag(3, e.translationX, e.translationY)));
//! handle.onEnd(() => session.end_drag(3));
//! ```

use mathsnap_core::config::LayoutConfig;
use mathsnap_core::geometry::{CornerHandle, CropSession, DragDelta, ScreenSize};
use wasm_bindgen::prelude::*;

use crate::types::{corner_from_u8, js_error, JsCropRect};

/// Shared crop box driven by the four corner handles.
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Start a session with the crop box centred on the screen.
    ///
    /// # Arguments
    /// * `screen_width` - Screen width in pixels
    /// * `screen_height` - Screen height in pixels
    /// * `vertical_offset` - Header height above the photo, in pixels
    #[wasm_bindgen(constructor)]
    pub fn new(screen_width: f64, screen_height: f64, vertical_offset: f64) -> JsCropSession {
        let layout = LayoutConfig {
            vertical_offset,
            ..LayoutConfig::default()
        };
        JsCropSession {
            inner: CropSession::new(ScreenSize::new(screen_width, screen_height), layout),
        }
    }

    /// Current crop rectangle.
    pub fn rect(&self) -> JsCropRect {
        JsCropRect::from_core(self.inner.rect())
    }

    #[wasm_bindgen(getter)]
    pub fn vertical_offset(&self) -> f64 {
        self.inner.layout().vertical_offset
    }

    #[wasm_bindgen(getter)]
    pub fn min_crop_size(&self) -> f64 {
        self.inner.layout().min_crop_size
    }

    pub fn begin_drag(&self, corner: u8) -> Result<(), JsValue> {
        self.inner.begin_drag(parse_corner(corner)?);
        Ok(())
    }

    /// Apply a move event and return the updated rectangle.
    pub fn drag(&self, corner: u8, dx: f64, dy: f64) -> Result<JsCropRect, JsValue> {
        let rect = self.inner.drag(parse_corner(corner)?, DragDelta::new(dx, dy));
        Ok(JsCropRect::from_core(rect))
    }

    pub fn end_drag(&self, corner: u8) -> Result<(), JsValue> {
        self.inner.end_drag(parse_corner(corner)?);
        Ok(())
    }

    /// Recentre the crop box, e.g. after a retake.
    pub fn reset(&self) {
        self.inner.reset();
    }
}

impl JsCropSession {
    pub(crate) fn core(&self) -> &CropSession {
        &self.inner
    }
}

fn parse_corner(value: u8) -> Result<CornerHandle, JsValue> {
    corner_from_u8(value).ok_or_else(|| js_error(format!("Unknown corner handle: {}", value)))
}
