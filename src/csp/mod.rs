//! Constraint-satisfaction solver for crossword fills

pub mod error;
pub mod assignment;
pub mod domains;
pub mod consistency;
pub mod propagation;
pub mod search;
pub mod creator;

pub use error::SolveError;
pub use assignment::{Assignment, Reservation};
pub use domains::DomainStore;
pub use propagation::{ArcConsistency, Propagation, PropagationStatistics};
pub use search::{BacktrackingSearch, SearchOptions, SearchStatistics};
pub use creator::{CrosswordCreator, Outcome, SolveReport, SolveStatistics, SolverOptions};
