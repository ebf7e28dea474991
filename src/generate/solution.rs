//! Solution representation for crossword fills

use crate::csp::{Assignment, SolveStatistics};
use crate::puzzle::{Crossword, Direction, Variable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One filled slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionEntry {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
    pub word: String,
}

impl SolutionEntry {
    pub fn variable(&self) -> Variable {
        Variable::new(self.row, self.col, self.direction, self.length)
    }
}

/// A solved crossword
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Grid dimensions the entries refer to
    pub width: usize,
    pub height: usize,
    /// Every filled slot, in slot order
    pub entries: Vec<SolutionEntry>,
    /// Letter grid, `None` for blocked or unfilled cells
    pub letters: Vec<Vec<Option<char>>>,
    /// Time taken to find this solution
    #[serde(skip)]
    pub solve_time: Duration,
    pub metadata: SolutionMetadata,
}

/// Metadata about a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Identifier derived from the filled words
    pub id: String,
    pub slot_count: usize,
    pub filled_cells: usize,
    pub nodes_explored: usize,
    pub backtracks: usize,
}

/// Letter grid for an assignment: every word written along its slot
pub fn letter_grid(crossword: &Crossword, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; crossword.width]; crossword.height];

    for (variable, word) in assignment {
        for (offset, ch) in word.chars().enumerate() {
            let (row, col) = variable.cell(offset);
            if let Some(cell) = letters.get_mut(row).and_then(|r| r.get_mut(col)) {
                *cell = Some(ch);
            }
        }
    }

    letters
}

impl Solution {
    /// Create a new solution from a complete assignment
    pub fn new(
        crossword: &Crossword,
        assignment: &Assignment,
        solve_time: Duration,
        statistics: Option<&SolveStatistics>,
    ) -> Self {
        let entries: Vec<SolutionEntry> = assignment
            .iter()
            .map(|(variable, word)| SolutionEntry {
                row: variable.row,
                col: variable.col,
                direction: variable.direction,
                length: variable.length,
                word: word.clone(),
            })
            .collect();

        let letters = letter_grid(crossword, assignment);
        let filled_cells = letters.iter().flatten().filter(|cell| cell.is_some()).count();

        let metadata = SolutionMetadata {
            id: Self::generate_id(&entries),
            slot_count: entries.len(),
            filled_cells,
            nodes_explored: statistics.map_or(0, |s| s.nodes_explored),
            backtracks: statistics.map_or(0, |s| s.backtracks),
        };

        Self {
            width: crossword.width,
            height: crossword.height,
            entries,
            letters,
            solve_time,
            metadata,
        }
    }

    /// Generate an ID for the solution based on its words
    fn generate_id(entries: &[SolutionEntry]) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        entries.iter().for_each(|entry| {
            entry.variable().hash(&mut hasher);
            entry.word.hash(&mut hasher);
        });

        format!("sol_{:x}", hasher.finish())
    }

    /// Rebuild the slot-to-word assignment
    pub fn assignment(&self) -> Assignment {
        self.entries
            .iter()
            .map(|entry| (entry.variable(), entry.word.clone()))
            .collect()
    }

    /// Words in slot order
    pub fn words(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.word.as_str()).collect()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
