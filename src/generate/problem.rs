//! Crossword generation problem definition

use super::{Solution, SolutionValidator};
use crate::config::Settings;
use crate::csp::{ArcConsistency, CrosswordCreator, DomainStore, SearchOptions, SolveStatistics, SolverOptions};
use crate::puzzle::{load_structure_from_file, load_words_from_file, Crossword, Variable};
use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A crossword structure together with the word list to fill it from
pub struct CrosswordProblem {
    settings: Settings,
    crossword: Crossword,
    words: BTreeSet<String>,
    last_statistics: Option<SolveStatistics>,
}

impl CrosswordProblem {
    /// Create a new problem from settings
    pub fn new(settings: Settings) -> Result<Self> {
        let crossword = load_structure_from_file(&settings.input.structure_file)
            .context("Failed to load structure file")?;
        let words = load_words_from_file(&settings.input.words_file)
            .context("Failed to load words file")?;

        Ok(Self::with_puzzle(settings, crossword, words))
    }

    /// Create a problem with an explicit crossword and word list (useful for testing)
    pub fn with_puzzle(settings: Settings, crossword: Crossword, words: BTreeSet<String>) -> Self {
        Self {
            settings,
            crossword,
            words,
            last_statistics: None,
        }
    }

    fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            enforce_arc_consistency: self.settings.solver.enforce_arc_consistency,
            search: SearchOptions {
                maintain_arc_consistency: self.settings.solver.maintain_arc_consistency,
                parallel: self.settings.solver.parallel,
            },
        }
    }

    /// Solve the problem. `Ok(None)` means the puzzle has no solution.
    pub fn solve(&mut self) -> Result<Option<Solution>> {
        info!(
            "Filling {}x{} grid ({} slots) from {} words",
            self.crossword.width,
            self.crossword.height,
            self.crossword.variables().len(),
            self.words.len()
        );

        let mut creator = CrosswordCreator::new(&self.crossword, &self.words, self.solver_options());
        let report = creator.solve().context("Solver invariant violated")?;
        let statistics = report.statistics;

        let Some(assignment) = report.assignment else {
            info!("No solution ({:?})", statistics.outcome);
            self.last_statistics = Some(statistics);
            return Ok(None);
        };

        let validation = SolutionValidator::new(&self.crossword).validate(&assignment);
        if !validation.is_valid {
            anyhow::bail!(
                "Solver returned an invalid assignment: {}",
                validation.error_message.unwrap_or_else(|| "Unknown error".to_string())
            );
        }

        let solution = Solution::new(&self.crossword, &assignment, statistics.solve_time, Some(&statistics));
        self.last_statistics = Some(statistics);
        Ok(Some(solution))
    }

    pub fn crossword(&self) -> &Crossword {
        &self.crossword
    }

    pub fn words(&self) -> &BTreeSet<String> {
        &self.words
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Statistics of the most recent `solve` call
    pub fn statistics(&self) -> Option<&SolveStatistics> {
        self.last_statistics.as_ref()
    }

    /// Describe the puzzle and how far propagation alone narrows it
    pub fn analyze(&self) -> PuzzleAnalysis {
        let mut domains = DomainStore::seed(&self.crossword, &self.words);
        domains.enforce_node_consistency();
        let after_node = Self::domain_sizes(&domains);

        let proven_unsolvable = match domains.first_empty() {
            Some(_) => true,
            None => {
                let consistent = ArcConsistency::new(&self.crossword)
                    .ac3(&mut domains, None)
                    .is_consistent();
                if !consistent {
                    warn!("Arc consistency alone proves the puzzle unsolvable");
                }
                !consistent
            }
        };
        let after_arc = Self::domain_sizes(&domains);

        let slot_lengths = self
            .crossword
            .variables()
            .iter()
            .map(|variable| variable.length)
            .counts()
            .into_iter()
            .collect();

        PuzzleAnalysis {
            width: self.crossword.width,
            height: self.crossword.height,
            fillable_cells: self.crossword.fillable_count(),
            slot_count: self.crossword.variables().len(),
            arc_count: self.crossword.arc_count(),
            slot_lengths,
            dictionary_size: self.words.len(),
            domain_sizes: self
                .crossword
                .variables()
                .iter()
                .map(|variable| {
                    let sizes = DomainSizes {
                        after_node_consistency: after_node.get(variable).copied().unwrap_or(0),
                        after_arc_consistency: after_arc.get(variable).copied().unwrap_or(0),
                    };
                    (*variable, sizes)
                })
                .collect(),
            proven_unsolvable,
        }
    }

    fn domain_sizes(domains: &DomainStore) -> BTreeMap<Variable, usize> {
        domains
            .iter()
            .map(|(variable, words)| (*variable, words.len()))
            .collect()
    }
}

/// Summary of a puzzle's structure and its domains
#[derive(Debug, Clone)]
pub struct PuzzleAnalysis {
    pub width: usize,
    pub height: usize,
    pub fillable_cells: usize,
    pub slot_count: usize,
    /// Directed arcs, so twice the number of crossings
    pub arc_count: usize,
    /// Number of slots of each length
    pub slot_lengths: BTreeMap<usize, usize>,
    pub dictionary_size: usize,
    pub domain_sizes: BTreeMap<Variable, DomainSizes>,
    /// Propagation alone emptied some domain
    pub proven_unsolvable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainSizes {
    pub after_node_consistency: usize,
    pub after_arc_consistency: usize,
}

impl fmt::Display for PuzzleAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Puzzle Analysis:")?;
        writeln!(f, "  Grid: {}x{} ({} fillable cells)", self.width, self.height, self.fillable_cells)?;
        writeln!(f, "  Slots: {}", self.slot_count)?;
        writeln!(f, "  Crossings: {}", self.arc_count / 2)?;
        writeln!(f, "  Dictionary: {} words", self.dictionary_size)?;
        writeln!(f, "  Slot lengths:")?;
        for (length, count) in &self.slot_lengths {
            writeln!(f, "    {:2} letters: {}", length, count)?;
        }
        writeln!(f, "  Candidates per slot (node / arc consistent):")?;
        for (variable, sizes) in &self.domain_sizes {
            writeln!(
                f,
                "    {}: {} / {}",
                variable, sizes.after_node_consistency, sizes.after_arc_consistency
            )?;
        }
        if self.proven_unsolvable {
            writeln!(f, "  Propagation proves this puzzle has no solution")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::create_example_files;
    use crate::testing::{plus_shape, structure0, words, words0};
    use tempfile::tempdir;

    #[test]
    fn test_problem_from_settings() {
        let temp_dir = tempdir().unwrap();
        create_example_files(temp_dir.path()).unwrap();

        let mut settings = Settings::default();
        settings.input.structure_file = temp_dir.path().join("structure0.txt");
        settings.input.words_file = temp_dir.path().join("words0.txt");

        let mut problem = CrosswordProblem::new(settings).unwrap();
        let solution = problem.solve().unwrap().expect("example puzzle is solvable");

        assert_eq!(solution.words(), vec!["SIX", "SEVEN", "FIVE", "NINE"]);
        assert_eq!(problem.statistics().unwrap().variable_count, 4);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.input.structure_file = temp_dir.path().join("missing.txt");

        assert!(CrosswordProblem::new(settings).is_err());
    }

    #[test]
    fn test_unsolvable_problem_returns_none() {
        let mut problem = CrosswordProblem::with_puzzle(Settings::default(), plus_shape(), words(&["CAT", "DOG"]));

        assert!(problem.solve().unwrap().is_none());
        assert!(problem.statistics().is_some());
    }

    #[test]
    fn test_solver_switches_agree() {
        let mut settings = Settings::default();
        settings.solver.maintain_arc_consistency = true;
        settings.solver.parallel = true;

        let mut fast = CrosswordProblem::with_puzzle(settings, structure0(), words0());
        let mut plain = CrosswordProblem::with_puzzle(Settings::default(), structure0(), words0());

        let a = fast.solve().unwrap().unwrap();
        let b = plain.solve().unwrap().unwrap();
        assert_eq!(a.entries, b.entries);
    }

    #[test]
    fn test_analysis() {
        let problem = CrosswordProblem::with_puzzle(Settings::default(), structure0(), words0());
        let analysis = problem.analyze();

        assert_eq!(analysis.slot_count, 4);
        assert_eq!(analysis.arc_count, 6);
        assert_eq!(analysis.fillable_cells, 13);
        assert_eq!(analysis.slot_lengths.get(&4), Some(&2));
        assert!(!analysis.proven_unsolvable);

        let total_after_arc: usize = analysis
            .domain_sizes
            .values()
            .map(|sizes| sizes.after_arc_consistency)
            .sum();
        assert_eq!(total_after_arc, 5);
        assert!(analysis.to_string().contains("Slots: 4"));
    }

    #[test]
    fn test_analysis_detects_wipeout() {
        let problem = CrosswordProblem::with_puzzle(Settings::default(), plus_shape(), words(&["DOGS"]));
        assert!(problem.analyze().proven_unsolvable);
    }
}
