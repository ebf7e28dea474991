//! Crossword Generator
//!
//! Fills a crossword grid from a word list by treating every slot as a
//! constraint-satisfaction variable: node consistency, AC-3 arc consistency
//! and backtracking search with MRV, degree and least-constraining-value
//! heuristics.

pub mod config;
pub mod puzzle;
pub mod csp;
pub mod generate;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Settings;
pub use csp::{Assignment, CrosswordCreator, SolveError};
pub use generate::{CrosswordProblem, Solution};
pub use puzzle::{Crossword, Direction, Variable};

use anyhow::Result;

/// Main entry point: load the puzzle named by `settings` and fill it.
/// `Ok(None)` means the puzzle has no solution.
pub fn generate_crossword(settings: Settings) -> Result<Option<Solution>> {
    let mut problem = CrosswordProblem::new(settings)?;
    problem.solve()
}
