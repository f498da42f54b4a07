//! Error types.
//!
//! Every failure the solver can report is a precondition violation detected
//! before optimization starts. They all surface as [`Error::InvalidInput`],
//! carrying an [`InputViolation`] that names the exact problem.

use thiserror::Error as ThisError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The caller-facing error.
///
/// # Examples
///
/// ```
/// use u_tour::{solve, Error, InputViolation};
///
/// let err = solve(vec![vec![0, 1], vec![1, 0], vec![2, 2]], None, None).unwrap_err();
/// assert!(matches!(
///     err,
///     Error::InvalidInput(InputViolation::NotSquare { row: 0, found: 2, expected: 3 })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The matrix, the initial route, or the configuration is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputViolation),
}

/// The precondition that a call violated.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum InputViolation {
    /// A tour needs at least two nodes.
    #[error("a tour needs at least 2 nodes, got {nodes}")]
    TooFewNodes {
        /// Number of nodes supplied.
        nodes: usize,
    },

    /// A matrix row does not have one entry per node.
    #[error("distance matrix is not square: row {row} has {found} entries, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Entries found in that row.
        found: usize,
        /// Number of rows (and required row length).
        expected: usize,
    },

    /// A travel cost is below zero.
    #[error("negative cost {cost} from node {from} to node {to}")]
    NegativeCost {
        /// Source node.
        from: usize,
        /// Target node.
        to: usize,
        /// The negative value.
        cost: i64,
    },

    /// Costs are so large that tour lengths or move deltas could exceed
    /// the range of the cost type.
    #[error("costs up to {max} over {nodes} nodes overflow tour length arithmetic")]
    CostOverflow {
        /// Largest cost in the matrix.
        max: i64,
        /// Number of nodes.
        nodes: usize,
    },

    /// The initial route does not cover the matrix.
    #[error("initial route has {found} nodes but the matrix has {expected}")]
    RouteLengthMismatch {
        /// Route length supplied.
        found: usize,
        /// Matrix size.
        expected: usize,
    },

    /// The initial route names a node that does not exist.
    #[error("node {node} at route position {position} is out of range for {nodes} nodes")]
    NodeOutOfRange {
        /// Position in the supplied route.
        position: usize,
        /// The out-of-range index.
        node: usize,
        /// Number of nodes.
        nodes: usize,
    },

    /// The initial route visits a node twice.
    #[error("node {node} appears twice in the initial route, at positions {first} and {second}")]
    DuplicateNode {
        /// The repeated node.
        node: usize,
        /// First position it appears at.
        first: usize,
        /// Second position it appears at.
        second: usize,
    },

    /// The construction start node does not exist.
    #[error("construction start node {start} is out of range for {nodes} nodes")]
    StartOutOfRange {
        /// Configured start node.
        start: usize,
        /// Number of nodes.
        nodes: usize,
    },

    /// A solver setting is unusable.
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),
}

impl InputViolation {
    /// Shorthand for [`InputViolation::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
