//! File I/O for crossword structures and word lists

use super::Crossword;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Example structure written by `create_example_files`
pub const EXAMPLE_STRUCTURE: &str = "#___#\n#_##_\n#_##_\n#_##_\n#____\n";

/// Example word list written by `create_example_files`
pub const EXAMPLE_WORDS: &str = "one\ntwo\nthree\nfour\nfive\nsix\nseven\neight\nnine\nten\n";

/// Load a crossword structure from a text file
/// Format: Each line represents a row, with '_' for fillable cells and anything else for blocked ones
pub fn load_structure_from_file<P: AsRef<Path>>(path: P) -> Result<Crossword> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read structure file: {}", path.as_ref().display()))?;

    parse_structure_from_string(&content)
        .with_context(|| format!("Failed to parse structure from file: {}", path.as_ref().display()))
}

/// Parse a crossword structure from a string representation.
///
/// Rows shorter than the longest one are padded with blocked cells.
pub fn parse_structure_from_string(content: &str) -> Result<Crossword> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.is_empty() {
        anyhow::bail!("Structure file is empty");
    }

    let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    if width == 0 {
        anyhow::bail!("Structure rows cannot all be empty");
    }

    let cells = lines
        .iter()
        .map(|line| {
            let mut row: Vec<bool> = line.chars().map(|ch| ch == '_').collect();
            row.resize(width, false);
            row
        })
        .collect();

    Crossword::from_cells(cells)
}

/// Load a word list from a text file, one word per line
pub fn load_words_from_file<P: AsRef<Path>>(path: P) -> Result<BTreeSet<String>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read words file: {}", path.as_ref().display()))?;

    Ok(parse_words_from_string(&content))
}

/// Trim, drop blank lines and upper-case every word
pub fn parse_words_from_string(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Create example structure and word files
pub fn create_example_files<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    std::fs::write(dir.join("structure0.txt"), EXAMPLE_STRUCTURE)
        .context("Failed to write structure0.txt")?;

    std::fs::write(dir.join("words0.txt"), EXAMPLE_WORDS)
        .context("Failed to write words0.txt")?;

    Ok(())
}
