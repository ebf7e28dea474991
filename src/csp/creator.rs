//! Solve driver: seed domains, enforce node and arc consistency, search

use super::propagation::{ArcConsistency, Propagation};
use super::search::{BacktrackingSearch, SearchOptions};
use super::{Assignment, DomainStore, SolveError};
use crate::puzzle::{Arc, Crossword};
use log::{debug, info};
use std::collections::BTreeSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Knobs for a solve run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    pub enforce_arc_consistency: bool,
    pub search: SearchOptions,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            enforce_arc_consistency: true,
            search: SearchOptions::default(),
        }
    }
}

/// How a solve run ended. Both failure outcomes mean "no solution"; the
/// distinction is kept for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Solved,
    UnsatisfiableDomain,
    SearchExhausted,
}

/// Statistics about a solve run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveStatistics {
    pub variable_count: usize,
    pub arc_count: usize,
    pub seeded_domain_total: usize,
    pub node_consistent_domain_total: usize,
    pub arc_consistent_domain_total: usize,
    pub arc_revisions: usize,
    pub nodes_explored: usize,
    pub backtracks: usize,
    pub outcome: Outcome,
    pub solve_time: Duration,
}

/// Result of a solve run
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub assignment: Option<Assignment>,
    pub statistics: SolveStatistics,
}

/// Owns the domain store for one crossword and drives the solve pipeline
pub struct CrosswordCreator<'a> {
    crossword: &'a Crossword,
    domains: DomainStore,
    options: SolverOptions,
}

impl<'a> CrosswordCreator<'a> {
    pub fn new(crossword: &'a Crossword, words: &BTreeSet<String>, options: SolverOptions) -> Self {
        Self {
            crossword,
            domains: DomainStore::seed(crossword, words),
            options,
        }
    }

    pub fn domains(&self) -> &DomainStore {
        &self.domains
    }

    /// Remove candidates whose length doesn't match their slot
    pub fn enforce_node_consistency(&mut self) -> usize {
        self.domains.enforce_node_consistency()
    }

    /// Run AC-3 from `arcs`, or from every arc when `None`.
    /// Returns `false` if some domain was emptied.
    pub fn ac3(&mut self, arcs: Option<Vec<Arc>>) -> bool {
        ArcConsistency::new(self.crossword)
            .ac3(&mut self.domains, arcs)
            .is_consistent()
    }

    /// Enforce node and arc consistency, then search for a complete
    /// assignment. `Ok` with no assignment means the puzzle has no solution.
    pub fn solve(&mut self) -> Result<SolveReport, SolveError> {
        let start_time = Instant::now();
        let seeded_domain_total = self.domains.total_size();

        info!(
            "Solving {} slot(s) with {} candidate word(s) each",
            self.crossword.variables().len(),
            self.domains.iter().next().map_or(0, |(_, words)| words.len())
        );

        let removed = self.enforce_node_consistency();
        let node_consistent_domain_total = self.domains.total_size();
        debug!("node consistency removed {} candidate(s)", removed);

        let mut arc_revisions = 0;
        let mut propagation = match self.domains.first_empty() {
            Some(variable) => Propagation::Wipeout(variable),
            None => Propagation::Consistent,
        };

        if propagation.is_consistent() && self.options.enforce_arc_consistency {
            let mut engine = ArcConsistency::new(self.crossword);
            propagation = engine.ac3(&mut self.domains, None);
            let statistics = engine.statistics();
            arc_revisions = statistics.revisions;
            debug!(
                "AC-3 processed {} arc(s), removed {} candidate(s)",
                statistics.arcs_processed, statistics.values_removed
            );
        }
        let arc_consistent_domain_total = self.domains.total_size();

        let mut statistics = SolveStatistics {
            variable_count: self.crossword.variables().len(),
            arc_count: self.crossword.arc_count(),
            seeded_domain_total,
            node_consistent_domain_total,
            arc_consistent_domain_total,
            arc_revisions,
            nodes_explored: 0,
            backtracks: 0,
            outcome: Outcome::UnsatisfiableDomain,
            solve_time: Duration::ZERO,
        };

        if let Propagation::Wipeout(variable) = propagation {
            info!("No candidates left for {}; puzzle has no solution", variable);
            statistics.solve_time = start_time.elapsed();
            return Ok(SolveReport {
                assignment: None,
                statistics,
            });
        }

        let search = BacktrackingSearch::new(self.crossword, self.options.search);
        let assignment = search.solve(&self.domains)?;
        let search_statistics = search.statistics();

        statistics.nodes_explored = search_statistics.nodes_explored;
        statistics.backtracks = search_statistics.backtracks;
        statistics.outcome = if assignment.is_some() {
            Outcome::Solved
        } else {
            Outcome::SearchExhausted
        };
        statistics.solve_time = start_time.elapsed();

        info!(
            "Search finished: {:?} after {} node(s), {} backtrack(s)",
            statistics.outcome, statistics.nodes_explored, statistics.backtracks
        );

        Ok(SolveReport {
            assignment,
            statistics,
        })
    }
}

impl fmt::Display for SolveStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solve Statistics:")?;
        writeln!(f, "  Slots: {}", self.variable_count)?;
        writeln!(f, "  Arcs: {}", self.arc_count)?;
        writeln!(f, "  Candidates (seeded): {}", self.seeded_domain_total)?;
        writeln!(f, "  Candidates (node consistent): {}", self.node_consistent_domain_total)?;
        writeln!(f, "  Candidates (arc consistent): {}", self.arc_consistent_domain_total)?;
        writeln!(f, "  Arc revisions: {}", self.arc_revisions)?;
        writeln!(f, "  Search nodes: {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks: {}", self.backtracks)?;
        writeln!(f, "  Outcome: {:?}", self.outcome)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::consistency::assignment_consistent;
    use crate::puzzle::{Direction, Variable};
    use crate::testing::{from_rows, plus_shape, structure0, words, words0};

    #[test]
    fn test_structure0_solution() {
        let crossword = structure0();
        let mut creator = CrosswordCreator::new(&crossword, &words0(), SolverOptions::default());
        let report = creator.solve().unwrap();

        let assignment = report.assignment.expect("structure0 is solvable");
        assert_eq!(assignment.get(&Variable::new(0, 1, Direction::Across, 3)), Some("SIX"));
        assert_eq!(assignment.get(&Variable::new(0, 1, Direction::Down, 5)), Some("SEVEN"));
        assert_eq!(assignment.get(&Variable::new(4, 1, Direction::Across, 4)), Some("NINE"));
        assert_eq!(assignment.get(&Variable::new(1, 4, Direction::Down, 4)), Some("FIVE"));
        assert_eq!(report.statistics.outcome, Outcome::Solved);
        assert_eq!(report.statistics.seeded_domain_total, 40);
        assert_eq!(report.statistics.node_consistent_domain_total, 13);
        assert_eq!(report.statistics.arc_consistent_domain_total, 5);
    }

    #[test]
    fn test_word_with_no_matching_length_never_appears() {
        let crossword = plus_shape();
        let list = words(&["CAT", "CAR", "ELEPHANT"]);
        let mut creator = CrosswordCreator::new(&crossword, &list, SolverOptions::default());

        creator.enforce_node_consistency();
        for (_, domain) in creator.domains().iter() {
            assert!(!domain.contains("ELEPHANT"));
        }

        let assignment = creator.solve().unwrap().assignment.unwrap();
        assert!(assignment.iter().all(|(_, word)| word != "ELEPHANT"));
        assert!(assignment_consistent(&crossword, &assignment));
    }

    #[test]
    fn test_empty_domain_reports_no_solution() {
        let crossword = plus_shape();
        let mut creator = CrosswordCreator::new(&crossword, &words(&["ELEPHANT"]), SolverOptions::default());
        let report = creator.solve().unwrap();

        assert!(report.assignment.is_none());
        assert_eq!(report.statistics.outcome, Outcome::UnsatisfiableDomain);
        assert_eq!(report.statistics.nodes_explored, 0);
    }

    #[test]
    fn test_exhausted_search_reports_no_solution() {
        let crossword = plus_shape();
        let mut creator = CrosswordCreator::new(&crossword, &words(&["CAT", "DOG"]), SolverOptions::default());
        let report = creator.solve().unwrap();

        assert!(report.assignment.is_none());
        assert_eq!(report.statistics.outcome, Outcome::SearchExhausted);
    }

    #[test]
    fn test_arc_consistency_switch_does_not_change_result() {
        let crossword = from_rows(&["___", "_#_", "___"]);
        let list = words(&["ABC", "CDE", "AFG", "GHE", "AXE", "CXG"]);

        let mut with_ac = CrosswordCreator::new(&crossword, &list, SolverOptions::default());
        let options = SolverOptions {
            enforce_arc_consistency: false,
            ..SolverOptions::default()
        };
        let mut without_ac = CrosswordCreator::new(&crossword, &list, options);

        let a = with_ac.solve().unwrap().assignment;
        let b = without_ac.solve().unwrap().assignment;
        assert_eq!(a.is_some(), b.is_some());
        assert!(assignment_consistent(&crossword, &a.unwrap()));
        assert!(assignment_consistent(&crossword, &b.unwrap()));
    }

    #[test]
    fn test_ac3_never_grows_domains() {
        let crossword = structure0();
        let mut creator = CrosswordCreator::new(&crossword, &words0(), SolverOptions::default());
        creator.enforce_node_consistency();
        let before = creator.domains().clone();

        assert!(creator.ac3(None));
        for (variable, domain) in creator.domains().iter() {
            assert!(domain.len() <= before.size(variable));
        }
    }

    #[test]
    fn test_puzzle_without_slots_is_trivially_solved() {
        let crossword = from_rows(&["_#", "#_"]);
        let mut creator = CrosswordCreator::new(&crossword, &words0(), SolverOptions::default());
        let report = creator.solve().unwrap();

        assert_eq!(report.assignment, Some(Assignment::default()));
        assert_eq!(report.statistics.outcome, Outcome::Solved);
    }
}
