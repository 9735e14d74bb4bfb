//! fOS DOM - Document Object Model
//!
//! Arena DOM tree that pages render into. Nodes live in a `DomTree` and are
//! addressed by `NodeId`; an `Element` is a cloneable handle onto one element
//! of a shared tree.

mod node;
mod tree;
mod element;
mod document;
mod operations;

pub use node::{Node, NodeData, ElementData, InlineStyle};
pub use tree::{DomTree, SharedTree};
pub use element::Element;
pub use document::Document;
pub use operations::{DomError, DomResult};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
