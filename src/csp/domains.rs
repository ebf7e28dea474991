//! Per-slot candidate word sets

use super::consistency::word_len;
use crate::puzzle::{Crossword, Variable};
use std::collections::{BTreeMap, BTreeSet};

/// Candidate words still possible for each slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStore {
    domains: BTreeMap<Variable, BTreeSet<String>>,
}

impl DomainStore {
    /// Every slot starts with the full word list
    pub fn seed(crossword: &Crossword, words: &BTreeSet<String>) -> Self {
        let domains = crossword
            .variables()
            .iter()
            .map(|variable| (*variable, words.clone()))
            .collect();

        Self { domains }
    }

    pub fn get(&self, variable: &Variable) -> Option<&BTreeSet<String>> {
        self.domains.get(variable)
    }

    /// Number of candidates left; zero for unknown slots
    pub fn size(&self, variable: &Variable) -> usize {
        self.domains.get(variable).map_or(0, BTreeSet::len)
    }

    /// Sum of all domain sizes
    pub fn total_size(&self) -> usize {
        self.domains.values().map(BTreeSet::len).sum()
    }

    /// First slot whose domain has been emptied, if any
    pub fn first_empty(&self) -> Option<Variable> {
        self.domains
            .iter()
            .find(|(_, words)| words.is_empty())
            .map(|(variable, _)| *variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &BTreeSet<String>)> {
        self.domains.iter()
    }

    /// Drop every candidate whose length differs from its slot's length.
    /// Returns the number of words removed.
    pub fn enforce_node_consistency(&mut self) -> usize {
        let mut removed = 0;
        for (variable, words) in self.domains.iter_mut() {
            let before = words.len();
            words.retain(|word| word_len(word) == variable.length);
            removed += before - words.len();
        }
        removed
    }

    /// Remove the given words from one slot's domain
    pub fn remove_all(&mut self, variable: &Variable, words: &[String]) {
        if let Some(domain) = self.domains.get_mut(variable) {
            for word in words {
                domain.remove(word);
            }
        }
    }

    /// Narrow a slot's domain to the single `word`
    pub fn restrict(&mut self, variable: &Variable, word: &str) {
        if let Some(domain) = self.domains.get_mut(variable) {
            domain.retain(|candidate| candidate == word);
        }
    }
}
