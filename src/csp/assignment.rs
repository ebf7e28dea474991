//! Partial and complete slot-to-word assignments

use super::SolveError;
use crate::puzzle::{Crossword, Variable};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// A mapping from slots to the single word chosen for each
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    words: BTreeMap<Variable, String>,
}

impl Assignment {
    pub fn get(&self, variable: &Variable) -> Option<&str> {
        self.words.get(variable).map(String::as_str)
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.words.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Variable, String> {
        self.words.iter()
    }

    /// Add a word for an unassigned slot
    pub fn assign(&mut self, variable: Variable, word: String) -> Result<(), SolveError> {
        match self.words.entry(variable) {
            btree_map::Entry::Occupied(_) => Err(SolveError::AlreadyAssigned(variable)),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(word);
                Ok(())
            }
        }
    }

    /// Remove a slot's word, returning it
    pub fn unassign(&mut self, variable: &Variable) -> Result<String, SolveError> {
        self.words
            .remove(variable)
            .ok_or(SolveError::NotAssigned(*variable))
    }

    /// Tentatively assign `word` to `variable`.
    ///
    /// The slot is released again when the returned reservation is dropped,
    /// unless it was committed first.
    pub fn reserve(&mut self, variable: Variable, word: String) -> Result<Reservation<'_>, SolveError> {
        self.assign(variable, word)?;
        Ok(Reservation {
            assignment: self,
            variable,
            committed: false,
        })
    }

    /// Every slot of the puzzle has a word
    pub fn is_complete(&self, crossword: &Crossword) -> bool {
        crossword.variables().iter().all(|variable| self.contains(variable))
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = (&'a Variable, &'a String);
    type IntoIter = btree_map::Iter<'a, Variable, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(Variable, String)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Variable, String)>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

/// A tentatively assigned slot that is undone on drop
#[derive(Debug)]
pub struct Reservation<'a> {
    assignment: &'a mut Assignment,
    variable: Variable,
    committed: bool,
}

impl Reservation<'_> {
    pub fn variable(&self) -> Variable {
        self.variable
    }

    /// Keep the word in the assignment
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Deref for Reservation<'_> {
    type Target = Assignment;

    fn deref(&self) -> &Assignment {
        self.assignment
    }
}

impl DerefMut for Reservation<'_> {
    fn deref_mut(&mut self) -> &mut Assignment {
        self.assignment
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.assignment.words.remove(&self.variable);
        }
    }
}
