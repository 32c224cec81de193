//! Fixed instructions and request builders for the two inference calls.

use super::{ChatMessage, ChatRequest, ContentPart, ImageUrl};
use crate::config::InferenceConfig;
use crate::encode::EncodedImage;

/// System instruction for transcribing a photographed problem.
pub const INTERPRETER_SYSTEM_PROMPT: &str = "\
You are a mathematical problem interpreter. You receive a photo of a math problem and \
turn it into one solvable, plain-text expression.

1. Written equations:
   - Keep the exact symbols and layout
   - Respect operator precedence
   - Keep variable names as written (x, y, n, ...)

2. Geometric diagrams:
   - Identify the shape and every given measurement
   - Note marked angles, sides and special properties
   - Build the equation from the theorem that applies
   Example: a right triangle with legs 3 and 4 becomes \"Find c where a = 3, b = 4 in right triangle\"

3. Word problems:
   - Pull out the numbers that matter
   - Identify the unknown
   - State the equation that relates them
   Example: \"A train travels 120km in 2 hours\" becomes \"120 = 2v, solve for v\"

4. Graphs and charts:
   - Read the coordinates of key points
   - Identify the function or relationship shown
   - Express it as an equation where possible

Reply with the expression or question only, no explanation.";

/// User text sent alongside the photo.
pub const INTERPRETER_USER_PROMPT: &str = "Analyze this math problem. If it is a diagram or \
word problem, formulate the matching equation. Return only the core mathematical question or \
expression.";

/// System instruction for the step-by-step solution.
pub const SOLVER_SYSTEM_PROMPT: &str = "Solve math problems with clear explanations. For each \
step: 1) explain why the method is used, 2) define key terms, 3) show the calculation. For \
geometry, name the theorem that applies and why. Use proper notation (x², √, θ).";

/// Worked example showing the exact JSON shape the solver must return.
pub const SOLUTION_SHAPE_EXAMPLE: &str = r#"{
  "expression": "In a right triangle, a = 3, b = 4, find c",
  "answer": "c = 5",
  "steps": [
    {
      "equation": "Right Triangle: a = 3, b = 4, c = ?",
      "description": "The triangle has a 90° angle, so the Pythagorean theorem relates its sides."
    },
    {
      "equation": "c² = a² + b²",
      "description": "In a right triangle the square of the hypotenuse (c) equals the sum of the squares of the legs (a and b)."
    },
    {
      "equation": "c² = 3² + 4²",
      "description": "Substitute the known legs a = 3 and b = 4; c is the hypotenuse we solve for."
    },
    {
      "equation": "c² = 9 + 16 = 25",
      "description": "Square each leg and add: 3² = 9, 4² = 16, sum = 25."
    },
    {
      "equation": "c = 5",
      "description": "Take the square root of 25 to get the hypotenuse."
    }
  ]
}"#;

/// User message for the solver: format instruction, example, then the problem.
pub fn solver_user_prompt(expression: &str) -> String {
    format!(
        "Solve this step by step, explaining concepts clearly. Format exactly like this:\n\
         {SOLUTION_SHAPE_EXAMPLE}\n\n\
         Math problem to solve: {expression}"
    )
}

/// Transcription request carrying the photo as an inline data URI.
pub fn interpret_request(config: &InferenceConfig, image: &EncodedImage) -> ChatRequest {
    ChatRequest {
        model: config.vision_model.clone(),
        messages: vec![
            ChatMessage::system(INTERPRETER_SYSTEM_PROMPT),
            ChatMessage::user_parts(vec![
                ContentPart::Text {
                    text: INTERPRETER_USER_PROMPT.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_uri(),
                    },
                },
            ]),
        ],
        temperature: 0.0,
        max_tokens: Some(config.vision_max_tokens),
    }
}

/// Solution request for a transcribed expression.
pub fn solve_request(config: &InferenceConfig, expression: &str) -> ChatRequest {
    ChatRequest {
        model: config.text_model.clone(),
        messages: vec![
            ChatMessage::system(SOLVER_SYSTEM_PROMPT),
            ChatMessage::user(solver_user_prompt(expression)),
        ],
        temperature: 0.0,
        max_tokens: None,
    }
}
