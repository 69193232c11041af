//! Error types for RouteForge.

use thiserror::Error;

/// Main error type for RouteForge operations.
///
/// Expiring the time budget is deliberately not an error: a solve that
/// runs out of time returns the best feasible solution found so far.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Malformed problem input, detected eagerly at model construction.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// The construction heuristic could not route every node.
    #[error("no feasible construction: {0}")]
    NoFeasibleConstruction(String),

    /// No solution satisfying all constraints exists.
    #[error("no feasible solution exists")]
    Infeasible,
}

/// Result type alias for RouteForge operations.
pub type Result<T> = std::result::Result<T, SolverError>;
