//! Errors raised by the solver core.
//!
//! An unsolvable puzzle is not an error: it is reported as an empty result.
//! These variants signal a broken caller contract inside the solver itself.

use crate::puzzle::Variable;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("slot {0} is not part of the puzzle")]
    UnknownVariable(Variable),

    #[error("slot {0} is already assigned")]
    AlreadyAssigned(Variable),

    #[error("slot {0} has no assignment to remove")]
    NotAssigned(Variable),
}
