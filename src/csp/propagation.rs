//! Arc consistency (AC-3) over the slot overlap graph

use super::consistency::char_at;
use super::DomainStore;
use crate::puzzle::{Arc, Crossword, Variable};
use log::{debug, trace};
use std::collections::{HashSet, VecDeque};

/// Result of running AC-3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Every surviving value has support in every neighbour
    Consistent,
    /// This slot's domain was emptied; no solution exists under the current domains
    Wipeout(Variable),
}

impl Propagation {
    pub fn is_consistent(&self) -> bool {
        matches!(self, Propagation::Consistent)
    }
}

/// Counters collected while propagating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStatistics {
    pub arcs_processed: usize,
    pub revisions: usize,
    pub values_removed: usize,
}

/// AC-3 engine bound to one crossword's constraint graph
pub struct ArcConsistency<'a> {
    crossword: &'a Crossword,
    statistics: PropagationStatistics,
}

impl<'a> ArcConsistency<'a> {
    pub fn new(crossword: &'a Crossword) -> Self {
        Self {
            crossword,
            statistics: PropagationStatistics::default(),
        }
    }

    pub fn statistics(&self) -> PropagationStatistics {
        self.statistics
    }

    /// Make `x` arc consistent with `y`: remove every word of `x` that has
    /// no partner in `y`'s domain at their overlap. Returns whether
    /// anything was removed.
    pub fn revise(&mut self, domains: &mut DomainStore, x: &Variable, y: &Variable) -> bool {
        let Some((i, j)) = self.crossword.overlap(x, y) else {
            return false;
        };

        // Letters that `y` can still place on the shared cell
        let support: HashSet<char> = domains
            .get(y)
            .into_iter()
            .flatten()
            .filter_map(|word| char_at(word, j))
            .collect();

        let unsupported: Vec<String> = domains
            .get(x)
            .into_iter()
            .flatten()
            .filter(|word| char_at(word, i).map_or(true, |c| !support.contains(&c)))
            .cloned()
            .collect();

        if unsupported.is_empty() {
            return false;
        }

        trace!("revise {} against {}: removing {} word(s)", x, y, unsupported.len());
        self.statistics.revisions += 1;
        self.statistics.values_removed += unsupported.len();
        domains.remove_all(x, &unsupported);
        true
    }

    /// Run AC-3 starting from `arcs`, or from every arc of the puzzle when
    /// `arcs` is `None`. Stops at the first emptied domain.
    pub fn ac3(&mut self, domains: &mut DomainStore, arcs: Option<Vec<Arc>>) -> Propagation {
        let mut queue: VecDeque<Arc> = arcs.unwrap_or_else(|| self.crossword.arcs()).into();
        let mut queued: HashSet<Arc> = queue.iter().copied().collect();

        while let Some((x, y)) = queue.pop_front() {
            queued.remove(&(x, y));
            self.statistics.arcs_processed += 1;

            if !self.revise(domains, &x, &y) {
                continue;
            }

            if domains.size(&x) == 0 {
                debug!("AC-3 emptied the domain of {}", x);
                return Propagation::Wipeout(x);
            }

            for z in self.crossword.neighbors(&x) {
                if *z != y && queued.insert((*z, x)) {
                    queue.push_back((*z, x));
                }
            }
        }

        Propagation::Consistent
    }
}
