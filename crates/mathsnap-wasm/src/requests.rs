//! Inference request bodies and reply handling for a `fetch`-based front end.
//!
//! The browser performs the HTTP calls itself; these bindings build the JSON
//! bodies and turn replies into solutions with the same fallbacks the native
//! pipeline uses.
//!
//! ```typescript
//! const vision = await post(interpret_request_body(image));
//! const expression = completion_content(await vision.text());
//! let solution;
//! if (needs_solver_call(expression)) {
//!   try {
//!     const reply = await post(solve_request_body(expression));
//!     solution = solution_from_reply(expression, completion_content(await reply.text()));
//!   } catch (e) {
//!     solution = solution_from_failure(expression, String(e));
//!   }
//! } else {
//!   solution = solution_from_reply(expression, undefined);
//! }
//! ```

use mathsnap_core::config::{InferenceConfig, SolverConfig};
use mathsnap_core::inference::{prompts, ChatRequest, ChatResponse, InferenceBackend, InferenceError};
use mathsnap_core::solve::ProblemSolver;
use wasm_bindgen::prelude::*;

use crate::types::{js_error, JsPreparedImage};

/// Replays one reply the front end already fetched.
struct FetchedReply(Result<Option<String>, InferenceError>);

impl InferenceBackend for FetchedReply {
    fn complete(&self, _request: &ChatRequest) -> Result<Option<String>, InferenceError> {
        self.0.clone()
    }
}

fn to_body(request: &ChatRequest) -> Result<String, JsValue> {
    serde_json::to_string(request).map_err(js_error)
}

/// JSON body for the transcription request.
///
/// # Arguments
/// * `image` - Prepared crop
/// * `model` - Vision model, defaults to `gpt-4o-mini`
#[wasm_bindgen]
pub fn interpret_request_body(image: &JsPreparedImage, model: Option<String>) -> Result<String, JsValue> {
    let mut config = InferenceConfig::default();
    if let Some(model) = model {
        config.vision_model = model;
    }
    to_body(&prompts::interpret_request(&config, image.encoded()))
}

/// JSON body for the solution request.
///
/// # Arguments
/// * `expression` - Transcribed expression
/// * `model` - Text model, defaults to `gpt-4`
#[wasm_bindgen]
pub fn solve_request_body(expression: &str, model: Option<String>) -> Result<String, JsValue> {
    let mut config = InferenceConfig::default();
    if let Some(model) = model {
        config.text_model = model;
    }
    to_body(&prompts::solve_request(&config, expression))
}

/// Trimmed `choices[0].message.content` of a completion body, if any.
#[wasm_bindgen]
pub fn completion_content(body: &str) -> Result<Option<String>, JsValue> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| js_error(format!("Malformed inference response: {}", e)))?;
    Ok(response
        .into_content()
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty()))
}

/// False when the expression is blank or reads like a refusal.
#[wasm_bindgen]
pub fn needs_solver_call(expression: &str) -> bool {
    let solver = ProblemSolver::new(
        FetchedReply(Ok(None)),
        InferenceConfig::default(),
        SolverConfig::default(),
    );
    !solver.is_refusal(expression)
}

/// Solution object for a fetched solver reply (or none).
#[wasm_bindgen]
pub fn solution_from_reply(expression: &str, content: Option<String>) -> Result<JsValue, JsValue> {
    solve_with(expression, FetchedReply(Ok(content)))
}

/// Solution object describing a failed solver request.
#[wasm_bindgen]
pub fn solution_from_failure(expression: &str, message: String) -> Result<JsValue, JsValue> {
    solve_with(expression, FetchedReply(Err(InferenceError::Transport(message))))
}

fn solve_with(expression: &str, reply: FetchedReply) -> Result<JsValue, JsValue> {
    let solver = ProblemSolver::new(reply, InferenceConfig::default(), SolverConfig::default());
    let outcome = solver.solve(expression);
    if let Some(reason) = outcome.reason() {
        web_sys::console::warn_1(&format!("Degraded solution: {:?}", reason).into());
    }
    serde_wasm_bindgen::to_value(&outcome.into_solution()).map_err(js_error)
}
