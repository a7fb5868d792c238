//! Solver-level error type.

use nashpivot_math::{Label, TableauError};
use thiserror::Error;

/// Errors surfaced while building games or following pivot paths.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Numeric failure inside the pivoting engine.
    #[error(transparent)]
    Tableau(#[from] TableauError),

    /// The extensive game violates perfect recall, so sequence-form
    /// realization plans are not well defined.
    #[error("game has imperfect recall")]
    ImperfectRecall,

    /// Structurally malformed game input.
    #[error("invalid game: {0}")]
    InvalidGame(String),

    /// A complementary pair had both or neither member basic where the
    /// path invariant requires exactly one.
    #[error("complementarity violated at label pair {0}")]
    BrokenComplementarity(Label),
}

/// Convenience alias used throughout the solver crate.
pub type SolveResult<T> = Result<T, SolveError>;
