//! Arena-backed compressed prefix tree.
//!
//! Nodes live in a single `Vec` and refer to their children by index, so a
//! split never has to move a subtree: the split node keeps its id and hands
//! its tail, handlers and children to a freshly pushed child.
//!
//! Every node carries the type of its own segment. A static node holds
//! literal text, a parameter node holds `:name` and matches one path segment,
//! and a catch-all node holds `*` and matches whatever is left of the path.
//! Siblings never share a label: static labels are the first character of
//! their prefix, and parameter and catch-all nodes use `:` and `*`, which
//! cannot begin a static prefix.

use std::mem;

use crate::method::MethodTable;

/// Index of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every tree.
    pub const ROOT: Self = Self(0);

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The type of segment a node matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Literal text.
    Static,
    /// One path segment bound to a name.
    Param,
    /// The remainder of the path.
    CatchAll,
}

/// A single node of the route tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    label: char,
    prefix: String,
    kind: NodeKind,
    handlers: MethodTable<T>,
    children: Vec<NodeId>,
}

impl<T> Node<T> {
    fn new(prefix: String, kind: NodeKind) -> Self {
        Self {
            label: prefix.chars().next().unwrap_or_default(),
            prefix,
            kind,
            handlers: MethodTable::new(),
            children: Vec::new(),
        }
    }

    fn root() -> Self {
        Self::new(String::new(), NodeKind::Static)
    }

    /// The first character of the prefix, used to pick among siblings.
    #[must_use]
    pub const fn label(&self) -> char {
        self.label
    }

    /// The text this node matches: a literal, `:name` or `*`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The node type.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The parameter name for parameter nodes.
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Param => Some(&self.prefix[1..]),
            NodeKind::Static | NodeKind::CatchAll => None,
        }
    }

    /// Values registered on this node, one slot per method.
    #[must_use]
    pub const fn handlers(&self) -> &MethodTable<T> {
        &self.handlers
    }

    pub(crate) fn handlers_mut(&mut self) -> &mut MethodTable<T> {
        &mut self.handlers
    }

    /// Ids of the direct children.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The node arena. Index 0 is always the root.
#[derive(Debug, Clone)]
pub(crate) struct Tree<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Tree<T> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Finds the static child whose prefix starts with `label`.
    pub(crate) fn static_child(&self, parent: NodeId, label: char) -> Option<NodeId> {
        self.child_where(parent, |n| n.kind == NodeKind::Static && n.label == label)
    }

    pub(crate) fn param_child(&self, parent: NodeId) -> Option<NodeId> {
        self.child_where(parent, |n| n.kind == NodeKind::Param)
    }

    pub(crate) fn catch_all_child(&self, parent: NodeId) -> Option<NodeId> {
        self.child_where(parent, |n| n.kind == NodeKind::CatchAll)
    }

    fn child_where(&self, parent: NodeId, pred: impl Fn(&Node<T>) -> bool) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&id| pred(self.node(id)))
    }

    fn attach(&mut self, parent: NodeId, node: Node<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.node_mut(parent).children.push(id);
        id
    }

    /// Inserts the literal `search` starting at the root.
    pub(crate) fn insert_root_static(&mut self, search: &str) -> NodeId {
        self.insert_static(NodeId::ROOT, search)
    }

    /// Inserts the literal `search` below `parent`, which is a parameter node.
    pub(crate) fn insert_static_under(&mut self, parent: NodeId, search: &str) -> NodeId {
        let label = first_char(search);
        match self.static_child(parent, label) {
            Some(child) => self.insert_static(child, search),
            None => self.attach(parent, Node::new(search.to_string(), NodeKind::Static)),
        }
    }

    /// Walks from `start` consuming `search`, splitting and attaching static
    /// nodes as needed, and returns the node whose path ends exactly at the
    /// end of `search`.
    ///
    /// `start` must be a static node whose label matches `search`.
    fn insert_static(&mut self, start: NodeId, search: &str) -> NodeId {
        let mut current = start;
        let mut search = search;

        loop {
            let node = self.node_mut(current);
            if node.prefix.is_empty() {
                // Only the untouched root has an empty prefix.
                node.label = first_char(search);
                node.prefix = search.to_string();
                return current;
            }

            let common = common_prefix_len(search, &node.prefix);
            if common < node.prefix.len() {
                self.split(current, common);
                if common == search.len() {
                    return current;
                }
                let leaf = Node::new(search[common..].to_string(), NodeKind::Static);
                return self.attach(current, leaf);
            }

            if common == search.len() {
                return current;
            }

            search = &search[common..];
            match self.static_child(current, first_char(search)) {
                Some(child) => current = child,
                None => {
                    let leaf = Node::new(search.to_string(), NodeKind::Static);
                    return self.attach(current, leaf);
                }
            }
        }
    }

    /// Splits `id` so that it keeps `prefix[..at]` and a new child receives
    /// the tail together with the node's type, handlers and children.
    fn split(&mut self, id: NodeId, at: usize) {
        let node = self.node_mut(id);
        let tail = node.prefix.split_off(at);
        let mut child = Node::new(tail, mem::replace(&mut node.kind, NodeKind::Static));
        child.handlers = mem::take(&mut node.handlers);
        child.children = mem::take(&mut node.children);

        let child_id = NodeId(self.nodes.len());
        self.nodes.push(child);
        self.node_mut(id).children.push(child_id);
    }

    /// Returns the parameter child of `parent`, creating it if needed.
    ///
    /// Fails with the existing name when a parameter of a different name
    /// already occupies this position.
    pub(crate) fn insert_param(&mut self, parent: NodeId, name: &str) -> Result<NodeId, String> {
        if let Some(id) = self.param_child(parent) {
            let existing = self.node(id).param_name().unwrap_or_default();
            if existing == name {
                return Ok(id);
            }
            return Err(existing.to_string());
        }
        Ok(self.attach(parent, Node::new(format!(":{name}"), NodeKind::Param)))
    }

    /// Returns the catch-all child of `parent`, creating it if needed.
    pub(crate) fn insert_catch_all(&mut self, parent: NodeId) -> NodeId {
        match self.catch_all_child(parent) {
            Some(id) => id,
            None => self.attach(parent, Node::new("*".to_string(), NodeKind::CatchAll)),
        }
    }
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or_default()
}

/// Byte length of the longest common prefix, never splitting a character.
pub(crate) fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i)
}
