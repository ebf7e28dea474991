//! Slots (CSP variables) of a crossword grid

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction a slot runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Across,
    Down,
}

/// A maximal run of fillable cells that receives one word.
///
/// Identified by its starting cell, direction and length; two variables are
/// equal iff all four fields match. The derived ordering (row, column,
/// direction, length) is what makes iteration over slots deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Self {
        Self { row, col, direction, length }
    }

    /// Grid cell holding the `offset`-th character of this slot's word
    #[inline]
    pub fn cell(&self, offset: usize) -> (usize, usize) {
        match self.direction {
            Direction::Across => (self.row, self.col + offset),
            Direction::Down => (self.row + offset, self.col),
        }
    }

    /// All cells covered by the slot, in word order
    pub fn cells(&self) -> Vec<(usize, usize)> {
        (0..self.length).map(|offset| self.cell(offset)).collect()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {} : {}", self.row, self.col, self.direction, self.length)
    }
}
