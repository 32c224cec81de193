//! Inference endpoint plumbing.
//!
//! The pipeline talks to a black-box chat-completions service through the
//! [`InferenceBackend`] trait. The HTTP implementation lives behind the
//! `http` feature; tests and the WASM build provide their own backends.
//!
//! - [`types`] - request/response wire types
//! - [`prompts`] - fixed instructions and request builders
//! - [`http`] - blocking `reqwest` backend (feature `http`)

#[cfg(feature = "http")]
mod http;
pub mod prompts;
mod types;

use std::sync::Arc;

use thiserror::Error;

#[cfg(feature = "http")]
pub use http::{parse_completion, HttpBackend};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, Choice, ContentPart, ImageUrl, MessageContent,
    ResponseMessage, Role,
};

/// Errors from an inference call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("Inference request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("Inference endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not a chat completion.
    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    /// The backend cannot be constructed from the given configuration.
    #[error("Inference configuration error: {0}")]
    Config(String),
}

/// A chat-completions service.
///
/// `Ok(None)` means the call succeeded but returned no content; callers
/// decide whether that is an error.
pub trait InferenceBackend: Send + Sync {
    fn complete(&self, request: &ChatRequest) -> Result<Option<String>, InferenceError>;
}

impl<T: InferenceBackend + ?Sized> InferenceBackend for &T {
    fn complete(&self, request: &ChatRequest) -> Result<Option<String>, InferenceError> {
        (**self).complete(request)
    }
}

impl<T: InferenceBackend + ?Sized> InferenceBackend for Arc<T> {
    fn complete(&self, request: &ChatRequest) -> Result<Option<String>, InferenceError> {
        (**self).complete(request)
    }
}

impl<T: InferenceBackend + ?Sized> InferenceBackend for Box<T> {
    fn complete(&self, request: &ChatRequest) -> Result<Option<String>, InferenceError> {
        (**self).complete(request)
    }
}
