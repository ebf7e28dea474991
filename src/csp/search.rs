//! Backtracking search with MRV/degree variable ordering and
//! least-constraining-value ordering

use super::consistency::{self, char_at};
use super::propagation::ArcConsistency;
use super::{Assignment, DomainStore, SolveError};
use crate::puzzle::{Crossword, Variable};
use itertools::Itertools;
use log::{debug, trace};
use rayon::prelude::*;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Switches that change pruning speed but never the set of reachable solutions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Re-run AC-3 on the neighbours of each tentatively assigned slot
    pub maintain_arc_consistency: bool,
    /// Explore the first slot's candidates on rayon workers
    pub parallel: bool,
}

/// Counters collected during the search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Tentative assignments tried
    pub nodes_explored: usize,
    /// Tentative assignments undone
    pub backtracks: usize,
}

#[derive(Debug, Default)]
struct Counters {
    nodes: AtomicUsize,
    backtracks: AtomicUsize,
}

/// Depth-first search over a crossword's arc-consistent domains
pub struct BacktrackingSearch<'a> {
    crossword: &'a Crossword,
    options: SearchOptions,
    counters: Counters,
}

impl<'a> BacktrackingSearch<'a> {
    pub fn new(crossword: &'a Crossword, options: SearchOptions) -> Self {
        Self {
            crossword,
            options,
            counters: Counters::default(),
        }
    }

    pub fn statistics(&self) -> SearchStatistics {
        SearchStatistics {
            nodes_explored: self.counters.nodes.load(Ordering::Relaxed),
            backtracks: self.counters.backtracks.load(Ordering::Relaxed),
        }
    }

    /// Search for a complete assignment. `domains` are only read; narrowed
    /// copies are made when inference is enabled.
    pub fn solve(&self, domains: &DomainStore) -> Result<Option<Assignment>, SolveError> {
        if self.options.parallel {
            return self.solve_parallel(domains);
        }

        let mut assignment = Assignment::default();
        let found = self.backtrack(&mut assignment, domains)?;
        Ok(found.then_some(assignment))
    }

    /// Branch on the first slot's candidates in parallel. Each worker owns
    /// its own domain copy and assignment; the first solution in value
    /// order wins, which is the one the sequential search would return.
    fn solve_parallel(&self, domains: &DomainStore) -> Result<Option<Assignment>, SolveError> {
        let empty = Assignment::default();
        let Some(variable) = self.select_unassigned_variable(&empty, domains) else {
            return Ok(Some(empty));
        };

        let values = self.order_domain_values(&variable, domains);
        debug!("parallel search over {} candidate(s) for {}", values.len(), variable);

        values
            .into_par_iter()
            .map(|word| -> Result<Option<Assignment>, SolveError> {
                let mut assignment = Assignment::default();
                let found = self.try_value(&mut assignment, domains, variable, word)?;
                Ok(found.then_some(assignment))
            })
            .find_map_first(Result::transpose)
            .transpose()
    }

    /// Extend `assignment` to a complete one. On success the assignment is
    /// left complete; on failure it is returned to its state at entry.
    pub fn backtrack(&self, assignment: &mut Assignment, domains: &DomainStore) -> Result<bool, SolveError> {
        let Some(variable) = self.select_unassigned_variable(assignment, domains) else {
            return Ok(true);
        };

        for word in self.order_domain_values(&variable, domains) {
            if self.try_value(assignment, domains, variable, word)? {
                return Ok(true);
            }
        }

        trace!("no value fits {}, backtracking", variable);
        Ok(false)
    }

    /// Tentatively assign `word` and recurse; the slot is released again
    /// unless the recursion completes the assignment.
    fn try_value(
        &self,
        assignment: &mut Assignment,
        domains: &DomainStore,
        variable: Variable,
        word: String,
    ) -> Result<bool, SolveError> {
        if !self.crossword.contains(&variable) {
            return Err(SolveError::UnknownVariable(variable));
        }

        self.counters.nodes.fetch_add(1, Ordering::Relaxed);
        let mut reservation = assignment.reserve(variable, word)?;

        if consistency::consistent_after(self.crossword, &reservation, &variable) {
            let found = if self.options.maintain_arc_consistency {
                match self.infer(domains, &reservation, &variable) {
                    Some(narrowed) => self.backtrack(&mut reservation, &narrowed)?,
                    None => false,
                }
            } else {
                self.backtrack(&mut reservation, domains)?
            };
            if found {
                reservation.commit();
                return Ok(true);
            }
        }

        self.counters.backtracks.fetch_add(1, Ordering::Relaxed);
        Ok(false)
    }

    /// Narrow a copy of the domains to the newly assigned word and propagate
    /// into its neighbours. `None` on a wipeout.
    fn infer(&self, domains: &DomainStore, assignment: &Assignment, variable: &Variable) -> Option<DomainStore> {
        let word = assignment.get(variable)?;

        let mut narrowed = domains.clone();
        narrowed.restrict(variable, word);

        let arcs = self
            .crossword
            .neighbors(variable)
            .map(|neighbor| (*neighbor, *variable))
            .collect();

        ArcConsistency::new(self.crossword)
            .ac3(&mut narrowed, Some(arcs))
            .is_consistent()
            .then_some(narrowed)
    }

    /// Unassigned slot with the fewest remaining candidates, ties broken by
    /// the most neighbours, then by slot order. `None` once every slot is
    /// assigned.
    pub fn select_unassigned_variable(&self, assignment: &Assignment, domains: &DomainStore) -> Option<Variable> {
        self.crossword
            .variables()
            .iter()
            .filter(|variable| !assignment.contains(variable))
            .min_by_key(|variable| (domains.size(variable), Reverse(self.crossword.degree(variable))))
            .copied()
    }

    /// Candidates of `variable`, ordered by how many words they would rule
    /// out across all neighbouring domains (fewest first). Equal counts keep
    /// the domain's order.
    pub fn order_domain_values(&self, variable: &Variable, domains: &DomainStore) -> Vec<String> {
        let Some(candidates) = domains.get(variable) else {
            return Vec::new();
        };

        // For every neighbour: its overlap offset in our word, its domain
        // size, and how many of its words put each letter on the shared cell.
        let neighbor_letters: Vec<(usize, usize, HashMap<char, usize>)> = self
            .crossword
            .neighbors(variable)
            .filter_map(|neighbor| {
                let (i, j) = self.crossword.overlap(variable, neighbor)?;
                let words = domains.get(neighbor)?;
                let counts = words.iter().filter_map(|word| char_at(word, j)).counts();
                Some((i, words.len(), counts))
            })
            .collect();

        candidates
            .iter()
            .map(|word| {
                let ruled_out: usize = neighbor_letters
                    .iter()
                    .map(|(i, total, counts)| {
                        let kept = char_at(word, *i).and_then(|c| counts.get(&c)).copied().unwrap_or(0);
                        total - kept
                    })
                    .sum();
                (word, ruled_out)
            })
            .sorted_by_key(|(_, ruled_out)| *ruled_out)
            .map(|(word, _)| word.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::consistency::{assignment_consistent, compatible};
    use crate::puzzle::Direction;
    use crate::testing::{brute_force_solvable, from_rows, plus_shape, structure0, words, words0};
    use std::collections::BTreeSet;

    fn prepared(crossword: &Crossword, list: &BTreeSet<String>) -> DomainStore {
        let mut domains = DomainStore::seed(crossword, list);
        domains.enforce_node_consistency();
        domains
    }

    fn all_options() -> Vec<SearchOptions> {
        vec![
            SearchOptions::default(),
            SearchOptions { maintain_arc_consistency: true, parallel: false },
            SearchOptions { maintain_arc_consistency: false, parallel: true },
            SearchOptions { maintain_arc_consistency: true, parallel: true },
        ]
    }

    #[test]
    fn test_mrv_then_degree() {
        let crossword = structure0();
        let list = words(&["SIX", "TEN", "SEVEN", "NINE", "FIVE", "FOUR", "NEST"]);
        let domains = prepared(&crossword, &list);
        let search = BacktrackingSearch::new(&crossword, SearchOptions::default());

        // The 5-letter slot has a single candidate.
        let left = Variable::new(0, 1, Direction::Down, 5);
        assert_eq!(search.select_unassigned_variable(&Assignment::default(), &domains), Some(left));

        // Among the remaining slots, top has 2 candidates and the two
        // 4-letter slots have 4 each.
        let mut assignment = Assignment::default();
        assignment.assign(left, "SEVEN".to_string()).unwrap();
        let top = Variable::new(0, 1, Direction::Across, 3);
        assert_eq!(search.select_unassigned_variable(&assignment, &domains), Some(top));
    }

    #[test]
    fn test_degree_breaks_domain_size_ties() {
        let crossword = structure0();
        let list = words(&["SIX", "TEN", "TWO", "SEVEN", "THREE", "EIGHT", "NINE", "FIVE", "FOUR"]);
        let domains = prepared(&crossword, &list);
        let search = BacktrackingSearch::new(&crossword, SearchOptions::default());

        // Every slot has 3 candidates; the 5-letter slot and the bottom slot
        // have 2 neighbours, and the 5-letter one comes first.
        let left = Variable::new(0, 1, Direction::Down, 5);
        assert_eq!(search.select_unassigned_variable(&Assignment::default(), &domains), Some(left));

        let mut assignment = Assignment::default();
        assignment.assign(left, "SEVEN".to_string()).unwrap();
        let bottom = Variable::new(4, 1, Direction::Across, 4);
        assert_eq!(search.select_unassigned_variable(&assignment, &domains), Some(bottom));
    }

    #[test]
    fn test_least_constraining_value_first() {
        let crossword = plus_shape();
        let across = Variable::new(1, 0, Direction::Across, 3);
        let list = words(&["CAT", "CAR", "BAT", "DOG"]);
        let domains = prepared(&crossword, &list);
        let search = BacktrackingSearch::new(&crossword, SearchOptions::default());

        // Down has three words with 'A' in the middle and one with 'O'.
        let ordered = search.order_domain_values(&across, &domains);
        assert_eq!(ordered, vec!["BAT", "CAR", "CAT", "DOG"]);
    }

    #[test]
    fn test_plus_shape_solution_respects_overlap() {
        let crossword = plus_shape();
        let list = words(&["CAT", "CAR", "DOG", "ACE"]);

        for options in all_options() {
            let domains = prepared(&crossword, &list);
            let search = BacktrackingSearch::new(&crossword, options);
            let assignment = search.solve(&domains).unwrap().expect("solvable");

            let across = Variable::new(1, 0, Direction::Across, 3);
            let down = Variable::new(0, 1, Direction::Down, 3);
            let (i, j) = crossword.overlap(&across, &down).unwrap();
            let a = assignment.get(&across).unwrap();
            let d = assignment.get(&down).unwrap();
            assert_eq!(a.chars().nth(i), d.chars().nth(j));
            assert_ne!(a, d);
        }
    }

    #[test]
    fn test_plus_shape_without_shared_letter_has_no_solution() {
        let crossword = plus_shape();
        let list = words(&["CAT", "DOG"]);

        for options in all_options() {
            let domains = prepared(&crossword, &list);
            let search = BacktrackingSearch::new(&crossword, options);
            assert_eq!(search.solve(&domains).unwrap(), None);
        }
        assert!(!brute_force_solvable(&crossword, &list));
    }

    #[test]
    fn test_solutions_are_sound_and_unique() {
        let crossword = structure0();
        let list = words0();

        for options in all_options() {
            let domains = prepared(&crossword, &list);
            let search = BacktrackingSearch::new(&crossword, options);
            let assignment = search.solve(&domains).unwrap().expect("structure0 is solvable");

            assert!(assignment.is_complete(&crossword));
            assert!(assignment_consistent(&crossword, &assignment));
            for (x, y) in crossword.arcs() {
                assert!(compatible(
                    &crossword,
                    &x,
                    assignment.get(&x).unwrap(),
                    &y,
                    assignment.get(&y).unwrap()
                ));
            }
            let distinct: BTreeSet<_> = assignment.iter().map(|(_, w)| w).collect();
            assert_eq!(distinct.len(), assignment.len());
        }
    }

    #[test]
    fn test_uniqueness_forces_failure() {
        // Two crossing 2-letter slots that could only both be "AA".
        let crossword = from_rows(&["__", "_#"]);
        let list = words(&["AA"]);
        let domains = prepared(&crossword, &list);

        let search = BacktrackingSearch::new(&crossword, SearchOptions::default());
        assert_eq!(search.solve(&domains).unwrap(), None);
        assert!(search.statistics().backtracks > 0);
        assert!(!brute_force_solvable(&crossword, &list));
    }

    #[test]
    fn test_failure_agrees_with_brute_force() {
        let crossword = from_rows(&["___", "_#_", "___"]);
        let dictionaries = [
            words(&["ABC", "CDE", "AFG", "GHE"]),
            words(&["ABC", "CDE", "AFG", "GHX"]),
            words(&["ABA", "ACA", "ADA", "AEA"]),
            words(&["ABA", "ACA", "ADA"]),
            words(&["TOP", "PIT", "TAN", "NAP", "TIP", "PAN"]),
        ];

        for list in dictionaries {
            let brute = brute_force_solvable(&crossword, &list);
            for options in all_options() {
                let domains = prepared(&crossword, &list);
                let search = BacktrackingSearch::new(&crossword, options);
                let result = search.solve(&domains).unwrap();
                assert_eq!(result.is_some(), brute, "{list:?} with {options:?}");
                if let Some(assignment) = result {
                    assert!(assignment_consistent(&crossword, &assignment));
                    assert!(assignment.is_complete(&crossword));
                }
            }
        }
    }

    #[test]
    fn test_failed_search_leaves_assignment_untouched() {
        let crossword = plus_shape();
        let list = words(&["CAT", "DOG"]);
        let domains = prepared(&crossword, &list);
        let search = BacktrackingSearch::new(&crossword, SearchOptions::default());

        let mut assignment = Assignment::default();
        assert!(!search.backtrack(&mut assignment, &domains).unwrap());
        assert!(assignment.is_empty());
    }

    #[test]
    fn test_complete_assignment_is_returned_immediately() {
        let crossword = plus_shape();
        let domains = prepared(&crossword, &words(&["CAT", "CAR"]));
        let search = BacktrackingSearch::new(&crossword, SearchOptions::default());

        let mut assignment: Assignment = [
            (Variable::new(1, 0, Direction::Across, 3), "CAT".to_string()),
            (Variable::new(0, 1, Direction::Down, 3), "CAR".to_string()),
        ]
        .into_iter()
        .collect();
        let before = assignment.clone();

        assert!(search.backtrack(&mut assignment, &domains).unwrap());
        assert_eq!(assignment, before);
        assert_eq!(search.statistics().nodes_explored, 0);
    }

    #[test]
    fn test_inference_never_grows_domains() {
        let crossword = structure0();
        let domains = prepared(&crossword, &words0());
        let options = SearchOptions { maintain_arc_consistency: true, parallel: false };
        let search = BacktrackingSearch::new(&crossword, options);

        let top = Variable::new(0, 1, Direction::Across, 3);
        let mut assignment = Assignment::default();
        assignment.assign(top, "SIX".to_string()).unwrap();
        let narrowed = search.infer(&domains, &assignment, &top).unwrap();

        for (variable, words) in narrowed.iter() {
            assert!(words.is_subset(domains.get(variable).unwrap()));
        }
        assert_eq!(narrowed.size(&top), 1);
    }
}
