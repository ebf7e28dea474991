//! Crossword grid structure: fillable cells, slots and their overlaps

use super::{Direction, Variable};
use anyhow::Result;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// A directed constraint edge between two overlapping slots
pub type Arc = (Variable, Variable);

/// Immutable description of a crossword puzzle.
///
/// Built once from the fillable/blocked grid; the slots, overlap offsets and
/// neighbour lists are derived on construction and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossword {
    pub width: usize,
    pub height: usize,
    cells: Vec<bool>,
    variables: BTreeSet<Variable>,
    overlaps: HashMap<Arc, (usize, usize)>,
    neighbors: BTreeMap<Variable, BTreeSet<Variable>>,
}

impl Crossword {
    /// Create a crossword from a 2D fillable/blocked array
    pub fn from_cells(cells: Vec<Vec<bool>>) -> Result<Self> {
        if cells.is_empty() {
            anyhow::bail!("Grid cannot be empty");
        }

        let height = cells.len();
        let width = cells[0].len();

        if width == 0 {
            anyhow::bail!("Grid width cannot be zero");
        }

        for (i, row) in cells.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!("Row {} has length {}, expected {}", i, row.len(), width);
            }
        }

        let flat_cells: Vec<bool> = cells.into_iter().flatten().collect();

        let mut crossword = Self {
            width,
            height,
            cells: flat_cells,
            variables: BTreeSet::new(),
            overlaps: HashMap::new(),
            neighbors: BTreeMap::new(),
        };
        crossword.variables = crossword.find_variables();
        crossword.compute_overlaps();

        Ok(crossword)
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Whether the cell can hold a letter; out of bounds cells are blocked
    pub fn is_fillable(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[self.index(row, col)]
    }

    pub fn fillable_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Scan rows for horizontal runs and columns for vertical runs of length >= 2
    fn find_variables(&self) -> BTreeSet<Variable> {
        let mut variables = BTreeSet::new();

        for row in 0..self.height {
            for col in 0..self.width {
                if !self.is_fillable(row, col) {
                    continue;
                }

                let starts_across = col == 0 || !self.is_fillable(row, col - 1);
                if starts_across {
                    let length = (col..self.width)
                        .take_while(|&c| self.is_fillable(row, c))
                        .count();
                    if length > 1 {
                        variables.insert(Variable::new(row, col, Direction::Across, length));
                    }
                }

                let starts_down = row == 0 || !self.is_fillable(row - 1, col);
                if starts_down {
                    let length = (row..self.height)
                        .take_while(|&r| self.is_fillable(r, col))
                        .count();
                    if length > 1 {
                        variables.insert(Variable::new(row, col, Direction::Down, length));
                    }
                }
            }
        }

        variables
    }

    /// Record, for every pair of slots sharing a cell, the offset of that
    /// cell in each slot's word. Both directions are stored.
    fn compute_overlaps(&mut self) {
        let mut occupants: HashMap<(usize, usize), Vec<(Variable, usize)>> = HashMap::new();
        for variable in &self.variables {
            for (offset, cell) in variable.cells().into_iter().enumerate() {
                occupants.entry(cell).or_default().push((*variable, offset));
            }
        }

        for variable in &self.variables {
            self.neighbors.insert(*variable, BTreeSet::new());
        }

        for slots in occupants.values() {
            for (&(a, i), &(b, j)) in slots.iter().tuple_combinations() {
                self.overlaps.insert((a, b), (i, j));
                self.overlaps.insert((b, a), (j, i));
                self.neighbors.entry(a).or_default().insert(b);
                self.neighbors.entry(b).or_default().insert(a);
            }
        }
    }

    /// All slots, in deterministic order
    pub fn variables(&self) -> &BTreeSet<Variable> {
        &self.variables
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.variables.contains(variable)
    }

    /// Offsets `(i, j)` such that character `i` of `a`'s word must equal
    /// character `j` of `b`'s word, or `None` if the slots don't cross
    pub fn overlap(&self, a: &Variable, b: &Variable) -> Option<(usize, usize)> {
        self.overlaps.get(&(*a, *b)).copied()
    }

    /// Slots that share a cell with `variable`
    pub fn neighbors(&self, variable: &Variable) -> impl Iterator<Item = &Variable> + '_ {
        self.neighbors.get(variable).into_iter().flatten()
    }

    /// Number of overlapping slots
    pub fn degree(&self, variable: &Variable) -> usize {
        self.neighbors.get(variable).map_or(0, BTreeSet::len)
    }

    /// Every directed arc `(x, y)` with a recorded overlap, in deterministic order
    pub fn arcs(&self) -> Vec<Arc> {
        self.neighbors
            .iter()
            .flat_map(|(x, ys)| ys.iter().map(move |y| (*x, *y)))
            .collect()
    }

    pub fn arc_count(&self) -> usize {
        self.overlaps.len()
    }
}

impl fmt::Display for Crossword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let symbol = if self.is_fillable(row, col) { '_' } else { '█' };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
