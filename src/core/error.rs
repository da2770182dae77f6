/*!
# Error Type

This module provides the error enum shared by all engine operations, together
with a crate-wide `Result` alias.
*/

use std::error::Error;
use std::fmt;

/// Error type for all engine operations.
#[derive(Debug)]
pub enum ThorupError {
    /// An argument is outside its valid range (e.g. a source vertex outside `0..V`).
    InvalidArgument(String),

    /// An operation was called before the state it requires was established,
    /// or after a state that forbids it (e.g. a query before construction,
    /// `add` on an already initialized split-findmin list).
    PreconditionViolation(String),

    /// The input graph does not satisfy the engine's contract
    /// (empty, disconnected, or carrying a non-positive edge weight).
    InvalidGraph(String),
}

impl ThorupError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ThorupError::InvalidArgument(message.into())
    }

    /// Creates a precondition violation error.
    pub fn precondition_violation(message: impl Into<String>) -> Self {
        ThorupError::PreconditionViolation(message.into())
    }

    /// Creates an invalid graph error.
    pub fn invalid_graph(message: impl Into<String>) -> Self {
        ThorupError::InvalidGraph(message.into())
    }
}

impl fmt::Display for ThorupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ThorupError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            ThorupError::PreconditionViolation(msg) => {
                write!(f, "Precondition violation: {}", msg)
            }
            ThorupError::InvalidGraph(msg) => write!(f, "Invalid graph: {}", msg),
        }
    }
}

impl Error for ThorupError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ThorupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ThorupError::invalid_argument("7 is no valid source vertex");
        assert_eq!(
            format!("{}", err),
            "Invalid argument: 7 is no valid source vertex"
        );

        let err = ThorupError::precondition_violation("spanning tree not constructed");
        assert_eq!(
            format!("{}", err),
            "Precondition violation: spanning tree not constructed"
        );

        let err = ThorupError::invalid_graph("graph is empty");
        assert_eq!(format!("{}", err), "Invalid graph: graph is empty");
    }
}
