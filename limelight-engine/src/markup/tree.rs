//! Arena-backed markup tree

/// Handle to a node in a [`MarkupTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element with its attributes in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name
    pub name: String,
    /// Attributes as `(name, value)` pairs, values unescaped
    pub attrs: Vec<(String, String)>,
}

impl Element {
    /// Element without attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Builder-style [`set_attr`](Self::set_attr)
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Value of attribute `name`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set or replace attribute `name`
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }
}

/// Payload of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Root container with no markup of its own
    Fragment,
    /// An element
    Element(Element),
    /// A text leaf, unescaped
    Text(String),
}

/// A node and its links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The node payload
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Parent, `None` for the root and detached nodes
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in document order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A parsed markup fragment
///
/// Nodes live in one arena and refer to each other by [`NodeId`]. Nodes
/// replaced out of the tree stay in the arena, detached; only nodes
/// reachable from [`root`](Self::root) are part of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupTree {
    nodes: Vec<Node>,
}

impl Default for MarkupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupTree {
    /// Empty fragment
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Fragment)],
        }
    }

    /// The fragment root
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Node by id
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Children of `id`; empty for unknown ids
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |node| node.children())
    }

    /// Parent of `id`
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Element payload of `id`
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.get(id).map(Node::data) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Mutable element payload of `id`
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.data) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Text payload of `id`
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(Node::data) {
            Some(NodeData::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Add a detached node
    pub fn create(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node::new(data));
        NodeId(self.nodes.len() - 1)
    }

    /// Attach a detached node as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
    }

    /// Append an element under `parent`
    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.create(NodeData::Element(element));
        self.append(parent, id);
        id
    }

    /// Append text under `parent`
    ///
    /// Text directly following a text sibling is merged into it, so a tree
    /// never holds two adjacent text leaves. Empty text adds nothing.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        if text.is_empty() {
            return None;
        }
        if let Some(&last) = self.children(parent).last() {
            if let Some(Node {
                data: NodeData::Text(existing),
                ..
            }) = self.nodes.get_mut(last.0)
            {
                existing.push_str(text);
                return Some(last);
            }
        }
        let id = self.create(NodeData::Text(text.to_string()));
        self.append(parent, id);
        Some(id)
    }

    /// Replace child `old` of its parent with `replacements`, in order
    ///
    /// The replacements must be detached. Returns `false` when `old` has no
    /// parent.
    pub fn replace(&mut self, old: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        let Some(position) = self.children(parent).iter().position(|&c| c == old) else {
            return false;
        };

        for &id in replacements {
            if let Some(node) = self.nodes.get_mut(id.0) {
                node.parent = Some(parent);
            }
        }
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children
                .splice(position..=position, replacements.iter().copied());
        }
        if let Some(node) = self.nodes.get_mut(old.0) {
            node.parent = None;
        }
        true
    }

    /// `id` and everything below it, in document order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Concatenated text of every leaf under `id`
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|node| self.text(node))
            .collect()
    }
}

/// Pre-order traversal, see [`MarkupTree::descendants`]
pub struct Descendants<'a> {
    tree: &'a MarkupTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
