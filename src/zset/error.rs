use std::collections::TryReserveError;

use thiserror::Error;

/// Errors raised by the sorted set data structures.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ZSetError {
    /// Scores must be comparable, so NaN never enters a set.
    #[error("resulting score is not a number (NaN)")]
    NotANumber,
    #[error("min or max is not a float")]
    InvalidBorder(String),
    #[error("out of memory while allocating a node")]
    OutOfMemory(#[from] TryReserveError),
}
