//! Step-by-step solving of a transcribed expression.
//!
//! The solver never fails: every error path produces a [`Solution`] whose
//! answer and single step describe the failure, tagged as
//! [`SolveOutcome::Degraded`] so callers can still tell it apart.

use serde::Deserialize;

use crate::config::{InferenceConfig, SolverConfig};
use crate::inference::{prompts, InferenceBackend};
use crate::solution::{Solution, SolutionStep, FALLBACK_ANSWER};

const NO_EXPRESSION: &str = "No expression provided";
const REFUSED_ANSWER: &str = "Could not identify a math problem";
const REFUSED_DESCRIPTION: &str = "The image analysis could not find a clear math problem to solve";
const UNPARSEABLE_ANSWER: &str = "Error: Could not parse solution";
const UNPARSEABLE_DESCRIPTION: &str = "Failed to process the solution. Please try again.";
const FAILED_ANSWER: &str = "Error: Could not solve expression";
const FAILED_DESCRIPTION: &str = "An error occurred while solving the expression";

/// Why a solution describes a failure instead of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeReason {
    /// The expression was empty or looked like a model refusal.
    Refused,
    /// The endpoint returned no content.
    NoContent,
    /// The content was not a solution document.
    Unparseable,
    /// The request itself failed.
    Transport,
}

/// Result of [`ProblemSolver::solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(Solution),
    Degraded {
        solution: Solution,
        reason: DegradeReason,
    },
}

impl SolveOutcome {
    pub fn solution(&self) -> &Solution {
        match self {
            SolveOutcome::Solved(solution) => solution,
            SolveOutcome::Degraded { solution, .. } => solution,
        }
    }

    pub fn into_solution(self) -> Solution {
        match self {
            SolveOutcome::Solved(solution) => solution,
            SolveOutcome::Degraded { solution, .. } => solution,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SolveOutcome::Degraded { .. })
    }

    pub fn reason(&self) -> Option<DegradeReason> {
        match self {
            SolveOutcome::Solved(_) => None,
            SolveOutcome::Degraded { reason, .. } => Some(*reason),
        }
    }
}

/// Solver reply as the model is instructed to write it.
///
/// `answer` and `steps` must be present; an object without them (`{}`, an
/// error document) is not a solution.
#[derive(Debug, Deserialize)]
struct SolutionReply {
    #[serde(default)]
    expression: String,
    answer: String,
    steps: Vec<SolutionStep>,
}

impl SolutionReply {
    fn is_blank(&self) -> bool {
        self.answer.trim().is_empty() && self.steps.is_empty()
    }
}

/// Asks the text model for a worked solution.
pub struct ProblemSolver<B> {
    backend: B,
    inference: InferenceConfig,
    config: SolverConfig,
}

impl<B: InferenceBackend> ProblemSolver<B> {
    pub fn new(backend: B, inference: InferenceConfig, config: SolverConfig) -> Self {
        Self {
            backend,
            inference,
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// True when `expression` is blank or contains a refusal marker.
    pub fn is_refusal(&self, expression: &str) -> bool {
        let lowered = expression.trim().to_lowercase();
        lowered.is_empty()
            || self
                .config
                .refusal_markers
                .iter()
                .any(|marker| lowered.contains(&marker.to_lowercase()))
    }

    pub fn solve(&self, expression: &str) -> SolveOutcome {
        if self.is_refusal(expression) {
            log::warn!("not solving, no usable expression: {:?}", expression);
            let shown = if expression.trim().is_empty() {
                NO_EXPRESSION
            } else {
                expression
            };
            return degraded(shown, REFUSED_ANSWER, REFUSED_DESCRIPTION, DegradeReason::Refused);
        }

        log::info!("solving {:?} with {}", expression, self.inference.text_model);
        let request = prompts::solve_request(&self.inference, expression);
        let content = match self.backend.complete(&request) {
            Ok(Some(content)) if !content.trim().is_empty() => content,
            Ok(_) => {
                log::warn!("solver returned no content");
                return degraded(expression, FAILED_ANSWER, FAILED_DESCRIPTION, DegradeReason::NoContent);
            }
            Err(e) => {
                log::error!("solver request failed: {}", e);
                return degraded(expression, FAILED_ANSWER, FAILED_DESCRIPTION, DegradeReason::Transport);
            }
        };

        match serde_json::from_str::<SolutionReply>(strip_code_fence(&content)) {
            Ok(reply) if !reply.is_blank() => {
                let mut solution = Solution {
                    expression: reply.expression,
                    answer: reply.answer,
                    steps: reply.steps,
                };
                if solution.expression.trim().is_empty() {
                    solution.expression = expression.to_string();
                }
                if solution.answer.trim().is_empty() {
                    solution.answer = FALLBACK_ANSWER.to_string();
                }
                log::info!("solved with {} steps", solution.steps.len());
                SolveOutcome::Solved(solution)
            }
            Ok(_) => {
                log::warn!("solver reply has neither answer nor steps: {}", content);
                unparseable(expression)
            }
            Err(e) => {
                log::warn!("could not parse solver reply ({}): {}", e, content);
                unparseable(expression)
            }
        }
    }
}

fn unparseable(expression: &str) -> SolveOutcome {
    degraded(
        expression,
        UNPARSEABLE_ANSWER,
        UNPARSEABLE_DESCRIPTION,
        DegradeReason::Unparseable,
    )
}

fn degraded(expression: &str, answer: &str, description: &str, reason: DegradeReason) -> SolveOutcome {
    SolveOutcome::Degraded {
        solution: Solution {
            expression: expression.to_string(),
            answer: answer.to_string(),
            steps: vec![SolutionStep::new(expression, description)],
        },
        reason,
    }
}

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````).
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") up to the first newline
    let body = rest.find('\n').map_or("", |i| &rest[i + 1..]);
    body.strip_suffix("```").unwrap_or(body).trim()
}
