//! Crossword generation: problem pipeline, solutions and validation

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{CrosswordProblem, PuzzleAnalysis};
pub use solution::{letter_grid, Solution, SolutionEntry};
pub use validator::{SolutionValidator, ValidationResult, Violation};
