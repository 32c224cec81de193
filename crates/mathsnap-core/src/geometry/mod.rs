//! Crop box geometry for the capture screen.
//!
//! - [`rect`] - the crop rectangle and the per-corner drag rules
//! - [`session`] - single-writer state cell shared by the four corner handles
//! - [`mapping`] - conversion from screen coordinates to photo pixels
//!
//! # Coordinate System
//!
//! - Crop rectangles are in screen pixels, measured from the top-left of the
//!   photo area below the header
//! - Pixel crop specs are in photo pixels, measured from the photo's top-left
//! - Origin is top-left, y grows downward

mod mapping;
mod rect;
mod session;

pub use mapping::{to_pixel_crop, MappingError, PhotoSize, PixelCropSpec, ScreenSize};
pub use rect::{drag_corner, CornerHandle, CropRectangle, DragDelta};
pub use session::CropSession;
