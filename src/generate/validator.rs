//! Independent validation of crossword assignments

use crate::csp::consistency::{char_at, word_len};
use crate::csp::Assignment;
use crate::puzzle::{Crossword, Variable};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;

/// Validates assignments against a crossword structure
pub struct SolutionValidator<'a> {
    crossword: &'a Crossword,
}

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub error_message: Option<String>,
}

/// A single broken rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The assignment names a slot the crossword doesn't have
    UnknownSlot(Variable),
    /// A slot of the crossword has no word
    MissingSlot(Variable),
    LengthMismatch { variable: Variable, word: String },
    /// Crossing slots put different letters on their shared cell
    OverlapConflict {
        first: Variable,
        second: Variable,
        cell: (usize, usize),
        letters: (Option<char>, Option<char>),
    },
    DuplicateWord { word: String, slots: Vec<Variable> },
}

impl<'a> SolutionValidator<'a> {
    pub fn new(crossword: &'a Crossword) -> Self {
        Self { crossword }
    }

    /// Check that `assignment` is a complete, consistent fill
    pub fn validate(&self, assignment: &Assignment) -> ValidationResult {
        let mut violations = Vec::new();

        for (variable, word) in assignment {
            if !self.crossword.contains(variable) {
                violations.push(Violation::UnknownSlot(*variable));
            } else if word_len(word) != variable.length {
                violations.push(Violation::LengthMismatch {
                    variable: *variable,
                    word: word.clone(),
                });
            }
        }

        for variable in self.crossword.variables() {
            if !assignment.contains(variable) {
                violations.push(Violation::MissingSlot(*variable));
            }
        }

        violations.extend(self.overlap_conflicts(assignment));
        violations.extend(Self::duplicates(assignment));

        let is_valid = violations.is_empty();
        let error_message = if is_valid {
            None
        } else {
            Some(Self::generate_error_message(&violations))
        };

        ValidationResult {
            is_valid,
            violations,
            error_message,
        }
    }

    fn overlap_conflicts(&self, assignment: &Assignment) -> Vec<Violation> {
        let mut conflicts = Vec::new();

        for (first, second) in self.crossword.arcs() {
            // Each undirected pair once
            if first > second {
                continue;
            }
            let (Some(word_a), Some(word_b)) = (assignment.get(&first), assignment.get(&second)) else {
                continue;
            };
            let Some((i, j)) = self.crossword.overlap(&first, &second) else {
                continue;
            };

            let letters = (char_at(word_a, i), char_at(word_b, j));
            if letters.0.is_none() || letters.0 != letters.1 {
                conflicts.push(Violation::OverlapConflict {
                    first,
                    second,
                    cell: first.cell(i),
                    letters,
                });
            }
        }

        conflicts
    }

    fn duplicates(assignment: &Assignment) -> Vec<Violation> {
        let mut slots_by_word: HashMap<&str, Vec<Variable>> = HashMap::new();
        for (variable, word) in assignment {
            slots_by_word.entry(word.as_str()).or_default().push(*variable);
        }

        slots_by_word
            .into_iter()
            .filter(|(_, slots)| slots.len() > 1)
            .sorted_by_key(|(word, _)| *word)
            .map(|(word, slots)| Violation::DuplicateWord {
                word: word.to_string(),
                slots,
            })
            .collect()
    }

    /// Generate a descriptive error message from the violations
    fn generate_error_message(violations: &[Violation]) -> String {
        let mut message = format!("Found {} violation(s). ", violations.len());

        for (i, violation) in violations.iter().take(3).enumerate() {
            if i == 0 {
                message.push_str("Examples: ");
            }
            message.push_str(&format!("{}; ", violation));
        }

        if violations.len() > 3 {
            message.push_str(&format!("... and {} more", violations.len() - 3));
        }

        message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnknownSlot(variable) => write!(f, "slot {} is not in the puzzle", variable),
            Violation::MissingSlot(variable) => write!(f, "slot {} has no word", variable),
            Violation::LengthMismatch { variable, word } => {
                write!(f, "'{}' does not fit slot {}", word, variable)
            }
            Violation::OverlapConflict { first, second, cell, letters } => write!(
                f,
                "{} and {} disagree at ({}, {}): {} vs {}",
                first,
                second,
                cell.0,
                cell.1,
                letters.0.unwrap_or('?'),
                letters.1.unwrap_or('?')
            ),
            Violation::DuplicateWord { word, slots } => {
                write!(f, "'{}' is used in {} slots", word, slots.len())
            }
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        writeln!(f, "  Violations: {}", self.violations.len())?;
        for violation in &self.violations {
            writeln!(f, "    - {}", violation)?;
        }
        Ok(())
    }
}
