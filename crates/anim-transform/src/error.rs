use thiserror::Error;

use crate::events::ListenerId;
use crate::node::NodeId;

/// Error types for transform tree operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The node id does not belong to this tree
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// No listener with this id is registered on the node
    #[error("Unknown listener {listener} on node {node}")]
    UnknownListener { node: NodeId, listener: ListenerId },
}

/// Result type using TransformError
pub type Result<T> = std::result::Result<T, TransformError>;
