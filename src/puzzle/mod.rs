//! Crossword puzzle structure and input files

pub mod variable;
pub mod structure;
pub mod io;

pub use variable::{Direction, Variable};
pub use structure::{Arc, Crossword};
pub use io::{load_structure_from_file, load_words_from_file, create_example_files};
