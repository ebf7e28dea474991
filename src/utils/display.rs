//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::generate::Solution;
use crate::puzzle::Crossword;
use anyhow::{Context, Result};
use std::path::Path;

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Render the filled grid: letters in fillable cells, `█` for blocked ones
    pub fn format_grid(crossword: &Crossword, solution: &Solution) -> String {
        let mut output = String::with_capacity(crossword.height * (crossword.width + 1));

        for row in 0..crossword.height {
            for col in 0..crossword.width {
                if crossword.is_fillable(row, col) {
                    let letter = solution
                        .letters
                        .get(row)
                        .and_then(|r| r.get(col))
                        .copied()
                        .flatten();
                    output.push(letter.unwrap_or(' '));
                } else {
                    output.push('█');
                }
            }
            output.push('\n');
        }

        output
    }

    /// Render the grid with row and column numbers
    pub fn format_grid_with_coords(crossword: &Crossword, solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..crossword.width {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        for (row, line) in Self::format_grid(crossword, solution).lines().enumerate() {
            output.push_str(&format!("{:2} ", row));
            for ch in line.chars() {
                output.push(' ');
                output.push(ch);
            }
            output.push('\n');
        }

        output
    }

    /// Format a solution for console output
    pub fn format_solution(crossword: &Crossword, solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Solution {} ===\n", solution.metadata.id));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!("Slots: {}\n", solution.metadata.slot_count));
        output.push_str(&format!(
            "Search: {} nodes, {} backtracks\n",
            solution.metadata.nodes_explored, solution.metadata.backtracks
        ));
        output.push('\n');
        output.push_str(&Self::format_grid(crossword, solution));
        output.push('\n');

        output.push_str("Words:\n");
        for entry in &solution.entries {
            output.push_str(&format!("  {}: {}\n", entry.variable(), entry.word));
        }

        output
    }

    /// Save a solution in the requested format
    pub fn save_solution<P: AsRef<Path>>(
        crossword: &Crossword,
        solution: &Solution,
        path: P,
        format: OutputFormat,
    ) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        match format {
            OutputFormat::Text => {
                std::fs::write(path, Self::format_grid(crossword, solution))
                    .with_context(|| format!("Failed to write solution to {}", path.display()))?;
            }
            OutputFormat::Json => {
                solution
                    .save_to_file(path)
                    .with_context(|| format!("Failed to write solution to {}", path.display()))?;
            }
        }

        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::Assignment;
    use crate::puzzle::{Direction, Variable};
    use crate::testing::plus_shape;
    use std::time::Duration;
    use tempfile::tempdir;

    fn plus_solution(crossword: &Crossword) -> Solution {
        let assignment: Assignment = [
            (Variable::new(1, 0, Direction::Across, 3), "CAT".to_string()),
            (Variable::new(0, 1, Direction::Down, 3), "CAR".to_string()),
        ]
        .into_iter()
        .collect();
        Solution::new(crossword, &assignment, Duration::ZERO, None)
    }

    #[test]
    fn test_grid_formatting() {
        let crossword = plus_shape();
        let solution = plus_solution(&crossword);

        assert_eq!(SolutionFormatter::format_grid(&crossword, &solution), "█C█\nCAT\n█R█\n");

        let with_coords = SolutionFormatter::format_grid_with_coords(&crossword, &solution);
        assert!(with_coords.starts_with("    0 1 2\n"));
        assert!(with_coords.contains(" 1  C A T"));
    }

    #[test]
    fn test_solution_summary_lists_words() {
        let crossword = plus_shape();
        let solution = plus_solution(&crossword);
        let text = SolutionFormatter::format_solution(&crossword, &solution);

        assert!(text.contains("(1, 0) across : 3: CAT"));
        assert!(text.contains("(0, 1) down : 3: CAR"));
    }

    #[test]
    fn test_save_solution_formats() {
        let temp_dir = tempdir().unwrap();
        let crossword = plus_shape();
        let solution = plus_solution(&crossword);

        let text_path = temp_dir.path().join("out/grid.txt");
        SolutionFormatter::save_solution(&crossword, &solution, &text_path, OutputFormat::Text).unwrap();
        assert_eq!(std::fs::read_to_string(&text_path).unwrap(), "█C█\nCAT\n█R█\n");

        let json_path = temp_dir.path().join("grid.json");
        SolutionFormatter::save_solution(&crossword, &solution, &json_path, OutputFormat::Json).unwrap();
        let loaded = Solution::load_from_file(&json_path).unwrap();
        assert_eq!(loaded.entries, solution.entries);
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
