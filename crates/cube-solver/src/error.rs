//! Error types for the solver.
//!
//! Every fallible entry point returns exactly one of a move sequence or a
//! [`SolveError`]; nothing is swallowed and nothing panics on bad input.

use thiserror::Error;

/// Errors that can occur while parsing a cube or searching for a solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The cube description or move text could not be parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The forward and backward searches never met within their depth bounds.
    #[error("No solution found within forward depth {forward_depth} and backward depth {backward_depth}")]
    NoSolutionFound {
        forward_depth: usize,
        backward_depth: usize,
    },

    /// A search hit its state ceiling or its deadline before finishing.
    #[error("Resource exhausted after recording {explored} states ({limit})")]
    ResourceExhausted { explored: usize, limit: Limit },
}

/// Which ceiling stopped a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    States(usize),
    Timeout,
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::States(max) => write!(f, "state limit {}", max),
            Limit::Timeout => f.write_str("timeout"),
        }
    }
}

impl SolveError {
    /// Short machine-readable tag, used in CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            SolveError::InvalidInput(_) => "invalid_input",
            SolveError::NoSolutionFound { .. } => "no_solution",
            SolveError::ResourceExhausted { .. } => "resource_exhausted",
        }
    }
}

pub type Result<T> = std::result::Result<T, SolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SolveError::NoSolutionFound {
            forward_depth: 6,
            backward_depth: 5,
        };
        assert_eq!(
            err.to_string(),
            "No solution found within forward depth 6 and backward depth 5"
        );
        assert_eq!(err.kind(), "no_solution");

        let err = SolveError::ResourceExhausted {
            explored: 10,
            limit: Limit::States(10),
        };
        assert_eq!(
            err.to_string(),
            "Resource exhausted after recording 10 states (state limit 10)"
        );
    }
}
