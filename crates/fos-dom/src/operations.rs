//! DOM Node Operations
//!
//! Errors shared by appendChild, removeChild and style mutation.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0:?} not found")]
    NotFound(NodeId),
    /// Hierarchy error (e.g., inserting ancestor)
    #[error("hierarchy request error: {child:?} cannot be placed under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Invalid node type
    #[error("node {0:?} is not an element")]
    InvalidNodeType(NodeId),
    /// Node is not a child
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}
