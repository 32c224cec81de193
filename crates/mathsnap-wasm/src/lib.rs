//! MathSnap WASM - WebAssembly bindings for the camera front end
//!
//! This crate exposes the mathsnap-core crop session, coordinate mapping,
//! image preparation and result handling to a JavaScript camera screen. The
//! front end performs the HTTP calls itself with `fetch`.
//!
//! # Module Structure
//!
//! - `session` - Crop box driven by four corner gestures
//! - `prepare` - Screen-to-photo mapping and crop/resize/encode
//! - `requests` - Inference request bodies and reply handling
//! - `params` - Result screen parameters and text rendering
//! - `types` - WASM-compatible wrapper types
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession, map_session_crop, prepare_image } from '@mathsnap/wasm';
//!
//! await init();
//!
//! const session = new JsCropSession(width, height, 100);
//! // ... corner gestures update the session ...
//! const crop = map_session_crop(session, photoWidth, photoHeight);
//! const image = prepare_image(photoBytes, crop);
//! ```

use wasm_bindgen::prelude::*;

mod params;
mod prepare;
mod requests;
mod session;
mod types;

pub use params::{params_to_solution, render_params, render_solution, solution_to_params};
pub use prepare::{map_crop, map_session_crop, photo_size, prepare_image};
pub use requests::{
    completion_content, interpret_request_body, needs_solver_call, solution_from_failure,
    solution_from_reply, solve_request_body,
};
pub use session::JsCropSession;
pub use types::{JsCropRect, JsPixelCrop, JsPreparedImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    mathsnap_core::VERSION.to_string()
}

/// Minimum crop box edge, for drawing the handles' limits.
#[wasm_bindgen]
pub fn min_crop_size() -> f64 {
    mathsnap_core::config::MIN_CROP_SIZE
}
