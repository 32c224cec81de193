//! Pixel-space transforms applied to a decoded photo before encoding.
//!
//! Only cropping is needed: orientation is already applied at decode time and
//! downscaling lives with the decode helpers.

mod crop;

pub use crop::crop_to_spec;
