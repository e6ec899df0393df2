//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node id does not refer to a live node
    #[error("Node not found: {0}")]
    NotFound(NodeId),
    /// Inserting a node into itself or one of its descendants
    #[error("Hierarchy request error: {child} cannot be inserted into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Operation not valid for this kind of node (e.g. children on a text node)
    #[error("Invalid node type for {0}")]
    InvalidNodeType(NodeId),
    /// Node is not a child of the given parent
    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// Attribute name that is not a well-formed HTML attribute name
    #[error("Invalid attribute name: {0:?}")]
    InvalidAttributeName(String),
}
