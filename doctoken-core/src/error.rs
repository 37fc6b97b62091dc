//! Traversal errors.
//!
//! Every variant is a contract violation by the caller or a node kind the
//! token vocabulary cannot express. The tree itself is well-formed by
//! construction, so there are no data-format errors here.

use thiserror::Error;

use crate::node::NodeKind;

/// Error raised while walking a tree as a token stream.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalError {
    /// `descend` without a current container node, or a root built from a
    /// scalar. `found` is `None` when there was no current node at all.
    #[error("invalid traversal: {}", describe_found(.found))]
    InvalidTraversal { found: Option<NodeKind> },

    /// The classifier met a node kind with no token mapping.
    #[error("unclassifiable node of kind {kind}")]
    UnclassifiableNode { kind: NodeKind },

    /// Nesting went deeper than the configured limit.
    #[error("nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

fn describe_found(found: &Option<NodeKind>) -> String {
    match found {
        Some(kind) => format!("current node is {kind}, not a container"),
        None => "no current node".to_string(),
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = TraversalError> = std::result::Result<T, E>;
