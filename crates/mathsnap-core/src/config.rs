//! Configuration for the capture-and-solve pipeline.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON document only
//! needs to name the values it overrides. The untuned heuristics (payload
//! threshold, refusal markers) live here rather than in the code that applies
//! them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum crop rectangle edge length in screen pixels.
pub const MIN_CROP_SIZE: f64 = 100.0;

/// Height of the header region drawn above the photo on the capture screen.
pub const DEFAULT_VERTICAL_OFFSET: f64 = 100.0;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(String),

    /// A value is outside its allowed range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Screen layout of the capture screen.
///
/// `vertical_offset` is shared by crop-box initialisation and the
/// screen-to-photo mapping; both must agree on where the photo starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Header height above the photo, in screen pixels.
    pub vertical_offset: f64,
    /// Minimum crop rectangle edge length, in screen pixels.
    pub min_crop_size: f64,
    /// Initial crop width as a fraction of screen width.
    pub initial_width_ratio: f64,
    /// Initial crop height as a fraction of screen height.
    pub initial_height_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertical_offset: DEFAULT_VERTICAL_OFFSET,
            min_crop_size: MIN_CROP_SIZE,
            initial_width_ratio: 0.8,
            initial_height_ratio: 0.35,
        }
    }
}

/// Options for turning a photo crop into an upload payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareOptions {
    /// Crops wider than this are downscaled to exactly this width.
    pub max_width: u32,
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
    /// Base64 payloads shorter than this are rejected as degenerate.
    ///
    /// A heuristic, not a measured bound.
    pub min_payload_len: usize,
    /// When set, a copy of every prepared JPEG is written here.
    pub debug_dir: Option<PathBuf>,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            max_width: 1200,
            jpeg_quality: 90,
            min_payload_len: 1000,
            debug_dir: None,
        }
    }
}

/// Inference endpoint settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of an OpenAI-compatible API, without the trailing path.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model used to transcribe the photo.
    pub vision_model: String,
    /// Model used to solve the transcribed expression.
    pub text_model: String,
    /// Completion cap for the transcription call.
    pub vision_max_tokens: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            vision_model: "gpt-4o-mini".to_string(),
            text_model: "gpt-4".to_string(),
            vision_max_tokens: 100,
            timeout_secs: 60,
        }
    }
}

// Keeps the key out of debug logs.
impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("vision_model", &self.vision_model)
            .field("text_model", &self.text_model)
            .field("vision_max_tokens", &self.vision_max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Solver fast-path settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Case-insensitive substrings that mark a transcription as a refusal.
    pub refusal_markers: Vec<String>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            refusal_markers: vec!["sorry".to_string(), "can't see".to_string()],
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: LayoutConfig,
    pub prepare: PrepareOptions,
    pub inference: InferenceConfig,
    pub solver: SolverConfig,
}

impl AppConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults overridden by environment variables.
    ///
    /// Reads `MATHSNAP_API_KEY` (falling back to `OPENAI_API_KEY`),
    /// `MATHSNAP_BASE_URL` and `MATHSNAP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(key) = var("MATHSNAP_API_KEY").or_else(|| var("OPENAI_API_KEY")) {
            self.inference.api_key = key;
        }
        if let Some(url) = var("MATHSNAP_BASE_URL") {
            self.inference.base_url = url;
        }
        if let Some(secs) = var("MATHSNAP_TIMEOUT_SECS") {
            self.inference.timeout_secs = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: format!("not an integer: {secs:?}"),
            })?;
        }
        Ok(())
    }

    /// Check ranges that would otherwise surface as confusing runtime errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if !(layout.min_crop_size.is_finite() && layout.min_crop_size > 0.0) {
            return Err(invalid("min_crop_size", "must be positive"));
        }
        if !(layout.vertical_offset.is_finite() && layout.vertical_offset >= 0.0) {
            return Err(invalid("vertical_offset", "must be non-negative"));
        }
        for (field, ratio) in [
            ("initial_width_ratio", layout.initial_width_ratio),
            ("initial_height_ratio", layout.initial_height_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(invalid(field, "must be in (0, 1]"));
            }
        }
        if self.prepare.max_width == 0 {
            return Err(invalid("max_width", "must be non-zero"));
        }
        if self.inference.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be non-zero"));
        }
        if self.inference.base_url.trim().is_empty() {
            return Err(invalid("base_url", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}
