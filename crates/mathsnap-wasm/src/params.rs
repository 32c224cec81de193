//! Result screen bindings: navigation parameters and text rendering.
//!
//! Route parameters are flat strings, so the solution travels as
//! `{ expression, answer, steps }` with `steps` holding JSON text.

use mathsnap_core::present;
use mathsnap_core::solution::{ResultParams, Solution};
use wasm_bindgen::prelude::*;

use crate::types::js_error;

/// Convert a `{ expression, answer, steps: [...] }` object into route parameters.
#[wasm_bindgen]
pub fn solution_to_params(solution: JsValue) -> Result<JsValue, JsValue> {
    let solution: Solution = serde_wasm_bindgen::from_value(solution)
        .map_err(|e| js_error(format!("Invalid solution: {}", e)))?;
    serde_wasm_bindgen::to_value(&ResultParams::from_solution(&solution)).map_err(js_error)
}

/// Rebuild the solution object from route parameters.
///
/// Malformed step text yields an empty step list and a console warning.
#[wasm_bindgen]
pub fn params_to_solution(params: JsValue) -> Result<JsValue, JsValue> {
    let params: ResultParams = serde_wasm_bindgen::from_value(params)
        .map_err(|e| js_error(format!("Invalid result parameters: {}", e)))?;
    if let Err(e) = params.try_steps() {
        web_sys::console::warn_1(&format!("Discarding unparseable solution steps: {}", e).into());
    }
    serde_wasm_bindgen::to_value(&params.into_solution()).map_err(js_error)
}

/// Plain-text rendering of a solution object.
#[wasm_bindgen]
pub fn render_solution(solution: JsValue) -> Result<String, JsValue> {
    let solution: Solution = serde_wasm_bindgen::from_value(solution)
        .map_err(|e| js_error(format!("Invalid solution: {}", e)))?;
    Ok(present::render(&solution))
}

/// Plain-text rendering straight from route parameters.
#[wasm_bindgen]
pub fn render_params(expression: String, answer: String, steps: String) -> String {
    let params = ResultParams {
        expression,
        answer,
        steps,
    };
    present::render(&params.into_solution())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_params() {
        let text = render_params(
            "2x = 4".to_string(),
            "x = 2".to_string(),
            r#"[{"equation":"x = 2","description":"Divide by 2"}]"#.to_string(),
        );
        assert!(text.contains("1. x = 2\n   Divide by 2"));
        assert!(text.ends_with("Solution\n   x = 2"));
    }

    #[test]
    fn test_render_params_malformed_steps() {
        let text = render_params("e".to_string(), "a".to_string(), "{oops".to_string());
        assert!(text.contains("No steps available"));
    }
}
