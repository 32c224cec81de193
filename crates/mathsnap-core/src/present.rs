//! Plain-text rendering of a solution.

use std::fmt::Write as _;

use crate::solution::Solution;

/// Render `solution` as the result screen lays it out: the expression, each
/// step's equation with its description indented below, then the answer.
pub fn render(solution: &Solution) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "Solving Steps");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", solution.expression);
    let _ = writeln!(out);

    if solution.steps.is_empty() {
        let _ = writeln!(out, "No steps available");
        let _ = writeln!(out);
    }
    for (i, step) in solution.steps.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, step.equation);
        for line in step.description.lines() {
            let _ = writeln!(out, "   {}", line);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Solution");
    let _ = write!(out, "   {}", solution.answer);
    out
}
