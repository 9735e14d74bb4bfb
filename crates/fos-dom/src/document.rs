//! Document - High-level document API

use crate::{DomTree, Element, SharedTree};

/// HTML Document with `<html>`, `<head>` and `<body>` in place
pub struct Document {
    tree: SharedTree,
    url: String,
    html: Element,
    head: Element,
    body: Element,
}

impl Document {
    /// Create a new empty document
    pub fn new(url: &str) -> Self {
        let tree = DomTree::shared();

        let html = Element::create(&tree, "html");
        let head = Element::create(&tree, "head");
        let body = Element::create(&tree, "body");

        {
            let mut t = tree.borrow_mut();
            let root = t.root();
            // Fresh nodes in a fresh tree: none of these can violate the hierarchy.
            let _ = t.append_child(root, html.id());
            let _ = t.append_child(html.id(), head.id());
            let _ = t.append_child(html.id(), body.id());
        }

        Self {
            tree,
            url: url.to_string(),
            html,
            head,
            body,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn tree(&self) -> &SharedTree {
        &self.tree
    }

    pub fn document_element(&self) -> &Element {
        &self.html
    }

    pub fn head(&self) -> &Element {
        &self.head
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    /// Create a detached element owned by this document
    pub fn create_element(&self, tag: &str) -> Element {
        Element::create(&self.tree, tag)
    }
}
