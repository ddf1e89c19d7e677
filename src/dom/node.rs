//! Arena-backed document tree.
//!
//! Nodes live in a flat arena owned by [`Document`] and are addressed by
//! copyable [`NodeId`] handles, so tree edits never fight the borrow
//! checker over parent/child ownership. Detached nodes (a removed subtree,
//! or a freshly parsed fragment container) stay in the arena but are
//! unreachable from the root; the arena is not garbage collected, which is
//! fine for the bounded lifetime of a resolution pass.
//!
//! The mutation surface is exactly what the inclusion resolver consumes:
//! insert-before, remove, attribute get/set/has/toggle, and subtree
//! query-by-tag. All operations are total; an id that does not satisfy an
//! operation's expectations degrades to a no-op rather than panicking.

use crate::constants::FRAGMENT_CONTAINER_TAG;

/// Handle to a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A single element attribute, name already lowercased by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The synthetic document root; never has a parent.
    Document,
    /// An element with a lowercase tag name and ordered attributes.
    Element { tag: String, attrs: Vec<Attribute> },
    /// A text run (already entity-decoded).
    Text(String),
    /// A comment body, without the `<!--`/`-->` delimiters.
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// An HTML-like document tree with the mutation primitives the inclusion
/// resolver requires.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the synthetic root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
        }
    }

    /// The synthetic root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Create a detached element node. The tag is stored lowercased.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Comment(text.to_string()))
    }

    /// Create a detached container element used to hold parsed fragments.
    pub(crate) fn create_fragment_container(&mut self) -> NodeId {
        self.create_element(FRAGMENT_CONTAINER_TAG)
    }

    /// The node's payload.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    /// Lowercase tag name, if `node` is an element.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Whether `node` is an element whose tag equals `tag`
    /// (case-insensitive).
    #[must_use]
    pub fn is_element(&self, node: NodeId, tag: &str) -> bool {
        self.tag(node).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    /// The node's parent, or `None` when detached (or the root).
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// The node's children, in document order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Whether `node` is reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Detach `node` from its parent. The node keeps its own children and
    /// stays valid as a detached subtree. Detaching an already-detached
    /// node is a no-op.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != node);
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first. Appending a node to itself is a no-op.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child {
            return;
        }
        self.remove(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `new_child` into `parent` immediately before `reference`,
    /// detaching `new_child` from any previous parent first. When
    /// `reference` is not a child of `parent`, the node is appended at the
    /// end instead.
    pub fn insert_before(&mut self, parent: NodeId, new_child: NodeId, reference: NodeId) {
        if parent == new_child {
            return;
        }
        self.remove(new_child);
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|&child| child == reference);
        match position {
            Some(index) => self.nodes[parent.0].children.insert(index, new_child),
            None => self.nodes[parent.0].children.push(new_child),
        }
        self.nodes[new_child.0].parent = Some(parent);
    }

    /// Attribute value by name (case-insensitive), if present.
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|attr| attr.name.eq_ignore_ascii_case(name))
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }

    /// Whether the attribute is present, regardless of value.
    #[must_use]
    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    /// Set an attribute, replacing any existing value. No-op on non-element
    /// nodes.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[node.0].kind {
            let name = name.to_ascii_lowercase();
            if let Some(existing) = attrs.iter_mut().find(|attr| attr.name == name) {
                existing.value = value.to_string();
            } else {
                attrs.push(Attribute {
                    name,
                    value: value.to_string(),
                });
            }
        }
    }

    /// Add or remove a boolean (presence) attribute.
    pub fn toggle_attr(&mut self, node: NodeId, name: &str, on: bool) {
        if on {
            if !self.has_attr(node, name) {
                self.set_attr(node, name, "");
            }
        } else if let NodeKind::Element { attrs, .. } = &mut self.nodes[node.0].kind {
            attrs.retain(|attr| !attr.name.eq_ignore_ascii_case(name));
        }
    }

    /// Ordered attributes of an element, empty for non-elements.
    #[must_use]
    pub fn attrs(&self, node: NodeId) -> &[Attribute] {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// All element descendants of `scope` with the given tag
    /// (case-insensitive), in document (pre-order) order. `scope` itself is
    /// never included.
    #[must_use]
    pub fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.is_element(node, tag) {
                found.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        found
    }

    /// Whether any ancestor of `node`, strictly above it and below the
    /// arena's detached boundary, is an element with the given tag.
    #[must_use]
    pub fn has_ancestor_with_tag(&self, node: NodeId, tag: &str) -> bool {
        let mut current = self.parent(node);
        while let Some(ancestor) = current {
            if self.is_element(ancestor, tag) {
                return true;
            }
            current = self.parent(ancestor);
        }
        false
    }

    /// Concatenated text of all descendant text nodes, in document order.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        if let NodeKind::Text(text) = &self.nodes[node.0].kind {
            out.push_str(text);
        }
        while let Some(current) = stack.pop() {
            if let NodeKind::Text(text) = &self.nodes[current.0].kind {
                out.push_str(text);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }
}
