//! Capture, confirm and process: the end-to-end flow of the camera screen.
//!
//! A confirm runs four stages in order: map the screen crop to photo pixels,
//! prepare the upload payload, interpret it, solve the expression. The first
//! three abort the run on error. Solver failures are absorbed into a degraded
//! [`Solution`], so once an expression exists the caller always gets
//! something to show.
//!
//! Only one confirm runs at a time per pipeline; a second call while one is in
//! flight returns [`PipelineError::Busy`] instead of queueing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, ConfigError};
use crate::decode;
use crate::geometry::{to_pixel_crop, CropRectangle, CropSession, MappingError, PhotoSize, ScreenSize};
use crate::inference::InferenceBackend;
use crate::interpret::{InterpretError, ProblemInterpreter};
use crate::prepare::{ImagePreparer, PrepareError};
use crate::solution::Solution;
use crate::solve::{ProblemSolver, SolveOutcome};

/// Errors that stop a capture or confirm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Failed to capture photo: {0}")]
    CaptureFailed(String),

    #[error("Invalid crop region: {0}")]
    InvalidCropRegion(String),

    #[error("Cropped image is too small or empty ({len} < {min} characters)")]
    ImageTooSmall { len: usize, min: usize },

    #[error("Image analysis failed: {0}")]
    InterpretationFailed(String),

    #[error("A photo is already being processed")]
    Busy,

    #[error("Processing was cancelled")]
    Cancelled,

    #[error("Failed to prepare image: {0}")]
    Preparation(String),
}

impl From<MappingError> for PipelineError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::InvalidCropRegion(reason) => PipelineError::InvalidCropRegion(reason),
        }
    }
}

impl From<PrepareError> for PipelineError {
    fn from(err: PrepareError) -> Self {
        match err {
            PrepareError::InvalidCropRegion(reason) => PipelineError::InvalidCropRegion(reason),
            PrepareError::ImageTooSmall { len, min } => PipelineError::ImageTooSmall { len, min },
            other => PipelineError::Preparation(other.to_string()),
        }
    }
}

impl From<InterpretError> for PipelineError {
    fn from(err: InterpretError) -> Self {
        match err {
            InterpretError::InterpretationFailed(cause) => PipelineError::InterpretationFailed(cause),
            InterpretError::ImageTooSmall { len, min } => PipelineError::ImageTooSmall { len, min },
        }
    }
}

/// Whether a confirm is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingState {
    Idle,
    Processing,
}

/// Shared flag a caller sets to abandon a running confirm.
///
/// Checked between stages; an inference call already in progress is not
/// interrupted, its result is discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), PipelineError> {
        if self.is_cancelled() {
            log::info!("processing cancelled");
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Failure reported by a camera implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CaptureError(pub String);

/// Device camera as seen by the pipeline.
pub trait Camera {
    fn permission(&self) -> PermissionStatus;

    /// Prompt the user; returns the resulting status.
    fn request_permission(&self) -> PermissionStatus;

    /// Take a photo and return its URI.
    fn take_picture(&self) -> Result<String, CaptureError>;

    /// Pixel size of the photo at `uri` as displayed, i.e. the upright size
    /// after any EXIF rotation. A portrait shot reports `width < height` even
    /// when the sensor data is stored landscape.
    fn image_size(&self, uri: &str) -> Result<(u32, u32), CaptureError>;
}

/// A photo returned by the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub uri: String,
    pub size: PhotoSize,
}

/// Take a photo, requesting permission first if it was never asked for.
pub fn capture<C: Camera + ?Sized>(camera: &C) -> Result<CapturedPhoto, PipelineError> {
    let status = match camera.permission() {
        PermissionStatus::Undetermined => camera.request_permission(),
        status => status,
    };
    if status != PermissionStatus::Granted {
        log::warn!("camera permission not granted: {:?}", status);
        return Err(PipelineError::PermissionDenied);
    }

    let uri = camera
        .take_picture()
        .map_err(|e| PipelineError::CaptureFailed(e.to_string()))?;
    let (width, height) = camera
        .image_size(&uri)
        .map_err(|e| PipelineError::CaptureFailed(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(PipelineError::CaptureFailed(format!(
            "camera reported an empty {}x{} photo",
            width, height
        )));
    }

    log::info!("captured {}x{} photo at {}", width, height, uri);
    Ok(CapturedPhoto {
        uri,
        size: PhotoSize::new(width, height),
    })
}

/// Clears the in-flight flag when a confirm returns, however it returns.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs confirms against one inference backend.
pub struct Pipeline<B> {
    backend: B,
    config: AppConfig,
    preparer: ImagePreparer,
    in_flight: AtomicBool,
}

impl<B: InferenceBackend> Pipeline<B> {
    /// Build a pipeline without checking `config`; see [`try_new`](Self::try_new).
    pub fn new(backend: B, config: AppConfig) -> Self {
        let preparer = ImagePreparer::new(config.prepare.clone());
        Self {
            backend,
            config,
            preparer,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Build a pipeline after [`AppConfig::validate`] accepts `config`.
    pub fn try_new(backend: B, config: AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(backend, config))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> ProcessingState {
        if self.in_flight.load(Ordering::SeqCst) {
            ProcessingState::Processing
        } else {
            ProcessingState::Idle
        }
    }

    /// Run a confirm and return the solution to display.
    pub fn confirm(
        &self,
        photo: &CapturedPhoto,
        bytes: &[u8],
        rect: &CropRectangle,
        screen: ScreenSize,
        cancel: &CancelToken,
    ) -> Result<Solution, PipelineError> {
        self.confirm_outcome(photo, bytes, rect, screen, cancel)
            .map(SolveOutcome::into_solution)
    }

    /// Confirm using the session's current rectangle and screen.
    pub fn confirm_session(
        &self,
        photo: &CapturedPhoto,
        bytes: &[u8],
        session: &CropSession,
        cancel: &CancelToken,
    ) -> Result<Solution, PipelineError> {
        self.confirm(photo, bytes, &session.rect(), session.screen(), cancel)
    }

    /// Like [`confirm`](Self::confirm), but keeps the degraded tag.
    pub fn confirm_outcome(
        &self,
        photo: &CapturedPhoto,
        bytes: &[u8],
        rect: &CropRectangle,
        screen: ScreenSize,
        cancel: &CancelToken,
    ) -> Result<SolveOutcome, PipelineError> {
        let _guard = self.begin()?;
        cancel.check()?;

        let size = upright_size(photo, bytes);
        let spec = to_pixel_crop(rect, screen, size, self.config.layout.vertical_offset)?;
        log::info!("preparing crop {:?} of {}", spec, photo.uri);
        let image = self.preparer.prepare(bytes, &spec)?;
        cancel.check()?;

        let interpreter = ProblemInterpreter::new(&self.backend, self.config.inference.clone())
            .with_min_payload_len(self.config.prepare.min_payload_len);
        let expression = interpreter.interpret(&image)?;
        cancel.check()?;

        let solver = ProblemSolver::new(
            &self.backend,
            self.config.inference.clone(),
            self.config.solver.clone(),
        );
        let outcome = solver.solve(&expression);
        cancel.check()?;

        if let Some(reason) = outcome.reason() {
            log::warn!("returning degraded solution ({:?})", reason);
        }
        Ok(outcome)
    }

    fn begin(&self) -> Result<InFlight<'_>, PipelineError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| PipelineError::Busy)?;
        Ok(InFlight(&self.in_flight))
    }
}

/// Size the crop is mapped against: the upright size of the bytes that will
/// actually be cropped, falling back to the camera's report when the headers
/// cannot be read (preparation then fails with the decode error).
fn upright_size(photo: &CapturedPhoto, bytes: &[u8]) -> PhotoSize {
    match decode::photo_size(bytes) {
        Ok(actual) => {
            if actual != photo.size {
                log::warn!(
                    "camera reported {}x{} for {} but the photo is {}x{}",
                    photo.size.pixel_width,
                    photo.size.pixel_height,
                    photo.uri,
                    actual.pixel_width,
                    actual.pixel_height
                );
            }
            actual
        }
        Err(_) => photo.size,
    }
}

#[cfg(feature = "http")]
impl Pipeline<crate::inference::HttpBackend> {
    /// Pipeline talking to the configured HTTP endpoint.
    ///
    /// The configuration is validated first; a rejected value is reported as
    /// [`InferenceError::Config`](crate::inference::InferenceError::Config).
    pub fn connect(config: AppConfig) -> Result<Self, crate::inference::InferenceError> {
        config
            .validate()
            .map_err(|e| crate::inference::InferenceError::Config(e.to_string()))?;
        let backend = crate::inference::HttpBackend::new(&config.inference)?;
        Ok(Self::new(backend, config))
    }
}
