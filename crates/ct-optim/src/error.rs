//! Error types for the optimisers.

use thiserror::Error;

/// `E` is the error type of the objective function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimError<E> {
    #[error("max iterations reached")]
    MaxIterations,

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// The objective failed; the search is aborted.
    #[error("{0}")]
    Objective(E),
}

pub type OptimResult<T, E> = Result<T, OptimError<E>>;
