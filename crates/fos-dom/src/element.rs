//! Element handle
//!
//! A cloneable reference to one element of a shared tree. Pages own one of
//! these as their display surface. A handle is only ever created for an
//! element node, and arena slots are never freed, so element-only tree
//! operations cannot fail through it.

use std::fmt;
use std::rc::Rc;

use crate::{DomError, DomResult, DomTree, NodeId, SharedTree};

/// Handle onto an element of a `SharedTree`
#[derive(Clone)]
pub struct Element {
    tree: SharedTree,
    id: NodeId,
}

impl Element {
    /// Create a detached element in `tree`
    pub fn create(tree: &SharedTree, tag: &str) -> Self {
        let id = tree.borrow_mut().create_element(tag);
        Self { tree: Rc::clone(tree), id }
    }

    /// Wrap an existing node; fails if the node is missing or not an element
    pub fn from_node(tree: &SharedTree, id: NodeId) -> DomResult<Self> {
        let is_element = tree.borrow()
            .get(id)
            .ok_or(DomError::NotFound(id))?
            .is_element();
        if !is_element {
            return Err(DomError::InvalidNodeType(id));
        }
        Ok(Self { tree: Rc::clone(tree), id })
    }

    /// Node id inside the tree
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Tree this element belongs to
    pub fn tree(&self) -> &SharedTree {
        &self.tree
    }

    /// Whether both handles point at the same node of the same tree
    pub fn same_node(&self, other: &Element) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.tree, &other.tree)
    }

    pub fn tag_name(&self) -> String {
        self.tree.borrow().tag_name(self.id).unwrap_or_default().to_string()
    }

    /// Read an inline style property
    pub fn style(&self, property: &str) -> Option<String> {
        self.tree.borrow()
            .style(self.id)
            .and_then(|s| s.get(property))
            .map(str::to_string)
    }

    /// Set an inline style property
    pub fn set_style(&self, property: &str, value: &str) {
        let result = self.tree.borrow_mut().set_style(self.id, property, value);
        debug_assert!(result.is_ok(), "element handle points at a non-element");
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        let tree = self.tree.borrow();
        tree.get(self.id)
            .and_then(|n| n.as_element())
            .and_then(|e| e.get_attr(name))
            .map(str::to_string)
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        let result = self.tree.borrow_mut().set_attr(self.id, name, value);
        debug_assert!(result.is_ok(), "element handle points at a non-element");
    }

    /// Append a child element
    pub fn append_child(&self, child: &Element) -> DomResult<()> {
        if !Rc::ptr_eq(&self.tree, &child.tree) {
            return Err(DomError::HierarchyRequest { parent: self.id, child: child.id });
        }
        self.tree.borrow_mut().append_child(self.id, child.id)
    }

    /// Append a text node
    pub fn append_text(&self, content: &str) -> DomResult<()> {
        let mut tree = self.tree.borrow_mut();
        let text = tree.create_text(content);
        tree.append_child(self.id, text)
    }

    /// Detach from the parent (`element.remove()`); no-op when detached
    pub fn remove(&self) {
        let _ = self.tree.borrow_mut().detach(self.id);
    }

    /// Parent element, if attached under one
    pub fn parent(&self) -> Option<Element> {
        let tree = self.tree.borrow();
        let parent = tree.parent(self.id)?;
        tree.get(parent)?.is_element().then(|| Element {
            tree: Rc::clone(&self.tree),
            id: parent,
        })
    }

    /// Child elements in document order
    pub fn children(&self) -> Vec<Element> {
        let tree = self.tree.borrow();
        tree.children(self.id)
            .iter()
            .filter(|&&c| tree.get(c).is_some_and(|n| n.is_element()))
            .map(|&id| Element { tree: Rc::clone(&self.tree), id })
            .collect()
    }

    /// Whether the element is reachable from the document root
    pub fn is_connected(&self) -> bool {
        self.tree.borrow().is_connected(self.id)
    }

    pub fn text_content(&self) -> String {
        self.tree.borrow().text_content(self.id)
    }

    /// Run `f` against the underlying tree
    pub fn with_tree<R>(&self, f: impl FnOnce(&DomTree) -> R) -> R {
        f(&self.tree.borrow())
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.tag_name())
            .finish()
    }
}
