//! MathSnap Core - photo-to-solution pipeline
//!
//! This crate holds everything between the camera and the result screen:
//! crop box geometry, screen-to-photo coordinate mapping, image preparation,
//! and the two inference calls that turn a photo into a worked solution.
//!
//! No math is evaluated locally. The interesting parts are the crop session
//! (four independent corner gestures against one rectangle) and the mapping
//! from screen space into the photo's pixel space.
//!
//! The blocking HTTP backend is behind the default `http` feature so the crate
//! also builds for `wasm32`.

pub mod config;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod inference;
pub mod interpret;
pub mod pipeline;
pub mod prepare;
pub mod present;
pub mod solution;
pub mod solve;
pub mod transform;

pub use config::{AppConfig, ConfigError, InferenceConfig, LayoutConfig, PrepareOptions, SolverConfig};
pub use encode::EncodedImage;
pub use geometry::{
    drag_corner, to_pixel_crop, CornerHandle, CropRectangle, CropSession, DragDelta, MappingError,
    PhotoSize, PixelCropSpec, ScreenSize,
};
pub use inference::{InferenceBackend, InferenceError};
pub use interpret::{InterpretError, ProblemInterpreter};
pub use pipeline::{
    capture, CancelToken, Camera, CaptureError, CapturedPhoto, PermissionStatus, Pipeline,
    PipelineError, ProcessingState,
};
pub use prepare::{ImagePreparer, PrepareError};
pub use present::render;
pub use solution::{ResultParams, Solution, SolutionStep};
pub use solve::{DegradeReason, ProblemSolver, SolveOutcome};

/// Crate version, as reported to the front end.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
