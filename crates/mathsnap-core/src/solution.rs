//! Solution model and its string-keyed form for screen navigation.

use serde::{Deserialize, Serialize};

/// Answer shown when a solver reply left the answer blank.
pub const FALLBACK_ANSWER: &str = "Could not solve";

/// One worked step: the equation and the explanation of how it was reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionStep {
    #[serde(default)]
    pub equation: String,
    #[serde(default)]
    pub description: String,
}

impl SolutionStep {
    pub fn new(equation: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            equation: equation.into(),
            description: description.into(),
        }
    }
}

/// A solved (or failed) problem as the result screen shows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub steps: Vec<SolutionStep>,
}

/// Navigation parameters for the result screen.
///
/// Routes carry flat string values, so the step list travels as JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultParams {
    pub expression: String,
    pub answer: String,
    pub steps: String,
}

impl ResultParams {
    pub fn from_solution(solution: &Solution) -> Self {
        // Vec<SolutionStep> of plain strings always serializes
        let steps = serde_json::to_string(&solution.steps).unwrap_or_else(|_| "[]".to_string());
        Self {
            expression: solution.expression.clone(),
            answer: solution.answer.clone(),
            steps,
        }
    }

    /// Parse the step text, reporting malformed JSON.
    pub fn try_steps(&self) -> Result<Vec<SolutionStep>, serde_json::Error> {
        serde_json::from_str(&self.steps)
    }

    /// Rebuild the solution; malformed step text gives an empty step list.
    pub fn into_solution(self) -> Solution {
        let steps = match self.try_steps() {
            Ok(steps) => steps,
            Err(e) => {
                log::warn!("discarding unparseable solution steps: {}", e);
                Vec::new()
            }
        };
        Solution {
            expression: self.expression,
            answer: self.answer,
            steps,
        }
    }
}
