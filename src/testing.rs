//! Shared fixtures for unit tests

use crate::csp::{consistency, Assignment};
use crate::puzzle::io::parse_structure_from_string;
use crate::puzzle::{Crossword, Variable};
use std::collections::BTreeSet;

/// Build a crossword from rows where `_` is fillable
pub(crate) fn from_rows(rows: &[&str]) -> Crossword {
    parse_structure_from_string(&rows.join("\n")).unwrap()
}

/// 3x3 grid with one across and one down slot crossing in the middle
pub(crate) fn plus_shape() -> Crossword {
    from_rows(&["#_#", "___", "#_#"])
}

pub(crate) fn structure0() -> Crossword {
    from_rows(&["#___#", "#_##_", "#_##_", "#_##_", "#____"])
}

pub(crate) fn words(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|w| w.to_string()).collect()
}

pub(crate) fn words0() -> BTreeSet<String> {
    words(&["ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN"])
}

/// Try every length-compatible combination; the reference answer for
/// "is there any solution at all" on tiny puzzles.
pub(crate) fn brute_force_solvable(crossword: &Crossword, words: &BTreeSet<String>) -> bool {
    let variables: Vec<Variable> = crossword.variables().iter().copied().collect();
    let mut assignment = Assignment::default();
    extend(crossword, words, &variables, &mut assignment)
}

fn extend(
    crossword: &Crossword,
    words: &BTreeSet<String>,
    remaining: &[Variable],
    assignment: &mut Assignment,
) -> bool {
    let Some((variable, rest)) = remaining.split_first() else {
        return consistency::assignment_consistent(crossword, assignment);
    };

    for word in words.iter().filter(|w| w.chars().count() == variable.length) {
        assignment.assign(*variable, word.clone()).unwrap();
        let found = extend(crossword, words, rest, assignment);
        assignment.unassign(variable).unwrap();
        if found {
            return true;
        }
    }
    false
}
