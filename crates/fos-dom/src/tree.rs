//! DOM Tree (arena-based allocation)

use std::cell::RefCell;
use std::rc::Rc;

use crate::{DomError, DomResult, InlineStyle, Node, NodeId};

/// Tree shared between a document and the element handles pointing into it
pub type SharedTree = Rc<RefCell<DomTree>>;

/// Arena-based DOM tree
///
/// Node slots are never freed: a removed node keeps its id and can be
/// re-inserted later.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Create a tree behind a shared handle
    pub fn shared() -> SharedTree {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Document root
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree, including detached ones
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Whether the node is reachable from the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(NodeId::ROOT, id)
    }

    /// Append `child` under `parent`, moving it out of its old parent first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if child == NodeId::ROOT || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if matches!(self.node(parent)?.data, crate::NodeData::Text(_)) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child).map(|_| ())
    }

    /// Detach a node from wherever it is attached, returning the old parent.
    /// Detaching an unattached node is a no-op.
    pub fn detach(&mut self, id: NodeId) -> DomResult<Option<NodeId>> {
        let Some(parent) = self.node_mut(id)?.parent.take() else {
            return Ok(None);
        };
        self.node_mut(parent)?.children.retain(|&c| c != id);
        tracing::trace!(node = ?id, parent = ?parent, "node detached");
        Ok(Some(parent))
    }

    /// Lowercased tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    /// Inline style of an element
    pub fn style(&self, id: NodeId) -> Option<&InlineStyle> {
        self.get(id)?.as_element().map(|e| &e.style)
    }

    /// Set an inline style property on an element
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> DomResult<()> {
        let element = self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))?;
        element.style.set(property, value);
        Ok(())
    }

    /// Set an attribute on an element
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let element = self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))?;
        element.set_attr(name, value);
        Ok(())
    }

    /// Concatenated text of a subtree
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.get(id) {
            if let Some(text) = node.as_text() {
                out.push_str(text);
            }
            for &child in &node.children {
                self.collect_text(child, out);
            }
        }
    }
}
