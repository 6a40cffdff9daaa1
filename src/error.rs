//! Error types.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type TspResult<T> = Result<T, TspError>;

/// Failures surfaced to callers.
///
/// Infeasible and unbounded solves are not errors: they are reported as
/// regular outcomes (see [`crate::milp::SolveResult`]).
#[derive(Debug, Error)]
pub enum TspError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A model references unknown variables or has inconsistent bounds.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// The external engine failed internally.
    #[error("engine fault: {0}")]
    Engine(String),

    /// The solver's assignment could not be turned into a tour.
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// Writing a diagnostic export failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A malformed arc assignment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// There are no nodes to visit.
    #[error("cannot decode a tour over zero nodes")]
    Empty,

    /// The assignment is not an `n x n` matrix.
    #[error("expected {expected} arc values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// No arc leaving `node` has a value close to 1.
    #[error("no outgoing arc selected from node {node}")]
    NoOutgoingArc { node: usize },

    /// More than one arc leaving `node` has a value close to 1.
    #[error("node {node} has {candidates} selected outgoing arcs")]
    AmbiguousArc { node: usize, candidates: usize },

    /// The walk reached `node` a second time at tour position `position`.
    #[error("node {node} revisited at position {position}")]
    NodeRevisited { node: usize, position: usize },

    /// The walk closed back on the start before covering every node.
    #[error("tour closed after {visited} of {expected} nodes")]
    PrematureReturn { visited: usize, expected: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_converts() {
        let err: TspError = DecodeError::NoOutgoingArc { node: 3 }.into();
        assert!(matches!(err, TspError::Decode(DecodeError::NoOutgoingArc { node: 3 })));
        assert_eq!(err.to_string(), "decode failed: no outgoing arc selected from node 3");
    }

    #[test]
    fn test_messages() {
        let err = DecodeError::PrematureReturn {
            visited: 2,
            expected: 5,
        };
        assert_eq!(err.to_string(), "tour closed after 2 of 5 nodes");

        let err = TspError::InvalidConfig("n_nodes must be positive".into());
        assert_eq!(err.to_string(), "invalid configuration: n_nodes must be positive");
    }
}
