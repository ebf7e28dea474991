//! Compatibility predicates shared by propagation and search

use super::Assignment;
use crate::puzzle::{Crossword, Variable};
use std::collections::HashSet;

/// Character at `offset`, counting chars rather than bytes
#[inline]
pub fn char_at(word: &str, offset: usize) -> Option<char> {
    word.chars().nth(offset)
}

#[inline]
pub fn word_len(word: &str) -> usize {
    word.chars().count()
}

/// Whether `word_x` in slot `x` and `word_y` in slot `y` agree on their
/// shared cell. Slots that don't cross are always compatible.
pub fn compatible(crossword: &Crossword, x: &Variable, word_x: &str, y: &Variable, word_y: &str) -> bool {
    match crossword.overlap(x, y) {
        None => true,
        Some((i, j)) => match (char_at(word_x, i), char_at(word_y, j)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// Whether the whole assignment is consistent: lengths match, crossing
/// slots agree and no word is used twice.
pub fn assignment_consistent(crossword: &Crossword, assignment: &Assignment) -> bool {
    let mut seen = HashSet::with_capacity(assignment.len());

    for (variable, word) in assignment {
        if word_len(word) != variable.length || !seen.insert(word.as_str()) {
            return false;
        }

        for neighbor in crossword.neighbors(variable) {
            if let Some(other) = assignment.get(neighbor) {
                if !compatible(crossword, variable, word, neighbor, other) {
                    return false;
                }
            }
        }
    }

    true
}

/// Incremental form of [`assignment_consistent`]: checks only the pairs
/// involving `variable`, assuming the rest of the assignment was already
/// consistent before it was added.
pub fn consistent_after(crossword: &Crossword, assignment: &Assignment, variable: &Variable) -> bool {
    let Some(word) = assignment.get(variable) else {
        return true;
    };

    if word_len(word) != variable.length {
        return false;
    }

    let reused = assignment
        .iter()
        .any(|(other, other_word)| other != variable && other_word == word);
    if reused {
        return false;
    }

    crossword.neighbors(variable).all(|neighbor| match assignment.get(neighbor) {
        Some(other) => compatible(crossword, variable, word, neighbor, other),
        None => true,
    })
}
