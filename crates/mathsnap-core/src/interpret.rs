//! Transcribing a prepared crop into a plain-text math expression.

use thiserror::Error;

use crate::config::{InferenceConfig, PrepareOptions};
use crate::encode::EncodedImage;
use crate::inference::{prompts, InferenceBackend};

/// Errors from problem interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    /// The endpoint failed or returned nothing usable.
    #[error("Image analysis failed: {0}")]
    InterpretationFailed(String),

    /// The payload is below the sanity threshold; no request was sent.
    #[error("Cropped image is too small or empty ({len} < {min} characters)")]
    ImageTooSmall { len: usize, min: usize },
}

/// Sends a prepared crop to the vision model and returns its transcription.
pub struct ProblemInterpreter<B> {
    backend: B,
    config: InferenceConfig,
    min_payload_len: usize,
}

impl<B: InferenceBackend> ProblemInterpreter<B> {
    pub fn new(backend: B, config: InferenceConfig) -> Self {
        Self {
            backend,
            config,
            min_payload_len: PrepareOptions::default().min_payload_len,
        }
    }

    /// Override the payload threshold checked before each request.
    pub fn with_min_payload_len(mut self, min: usize) -> Self {
        self.min_payload_len = min;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Transcribe `image` into a single expression or question.
    ///
    /// The returned text is trimmed and otherwise passed through unchanged;
    /// refusals ("Sorry, I can't see...") are left for the solver to detect.
    pub fn interpret(&self, image: &EncodedImage) -> Result<String, InterpretError> {
        if image.len() < self.min_payload_len {
            return Err(InterpretError::ImageTooSmall {
                len: image.len(),
                min: self.min_payload_len,
            });
        }

        log::info!(
            "sending {}x{} crop ({} chars) to {}",
            image.width,
            image.height,
            image.len(),
            self.config.vision_model
        );
        let request = prompts::interpret_request(&self.config, image);
        let content = self
            .backend
            .complete(&request)
            .map_err(|e| InterpretError::InterpretationFailed(e.to_string()))?;

        let text = content.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(InterpretError::InterpretationFailed(
                "no content in response".to_string(),
            ));
        }

        log::info!("interpreted expression: {}", text);
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::testing::ScriptedBackend;
    use crate::inference::InferenceError;

    fn payload(len: usize) -> EncodedImage {
        EncodedImage {
            data: "A".repeat(len),
            width: 10,
            height: 10,
        }
    }

    #[test]
    fn test_interpret_trims_content() {
        let backend = ScriptedBackend::new().reply("  2x + 3 = 7\n");
        let interpreter = ProblemInterpreter::new(&backend, InferenceConfig::default());

        assert_eq!(interpreter.interpret(&payload(2000)).unwrap(), "2x + 3 = 7");

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].image_count(), 1);
        assert_eq!(requests[0].max_tokens, Some(100));
    }

    #[test]
    fn test_interpret_passes_refusal_through() {
        let backend = ScriptedBackend::new().reply("Sorry, I can't see a problem.");
        let interpreter = ProblemInterpreter::new(&backend, InferenceConfig::default());
        assert_eq!(
            interpreter.interpret(&payload(2000)).unwrap(),
            "Sorry, I can't see a problem."
        );
    }

    #[test]
    fn test_interpret_empty_content_fails() {
        for backend in [
            ScriptedBackend::new().empty(),
            ScriptedBackend::new().reply("   "),
        ] {
            let interpreter = ProblemInterpreter::new(&backend, InferenceConfig::default());
            assert!(matches!(
                interpreter.interpret(&payload(2000)),
                Err(InterpretError::InterpretationFailed(_))
            ));
        }
    }

    #[test]
    fn test_interpret_transport_failure_carries_cause() {
        let backend =
            ScriptedBackend::new().fail(InferenceError::Transport("connection reset".to_string()));
        let interpreter = ProblemInterpreter::new(&backend, InferenceConfig::default());
        match interpreter.interpret(&payload(2000)) {
            Err(InterpretError::InterpretationFailed(cause)) => {
                assert!(cause.contains("connection reset"))
            }
            other => panic!("expected InterpretationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_small_payload_rejected_without_call() {
        let backend = ScriptedBackend::new().reply("x");
        let interpreter = ProblemInterpreter::new(&backend, InferenceConfig::default());
        assert_eq!(
            interpreter.interpret(&payload(999)),
            Err(InterpretError::ImageTooSmall { len: 999, min: 1000 })
        );
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_threshold_override() {
        let backend = ScriptedBackend::new().reply("1 + 1");
        let interpreter =
            ProblemInterpreter::new(&backend, InferenceConfig::default()).with_min_payload_len(0);
        assert_eq!(interpreter.interpret(&payload(4)).unwrap(), "1 + 1");
    }
}
