//! Arena-backed mutable element tree.
//!
//! ```text
//! XmlTree
//! ├── nodes: Vec<Element>   (index = NodeId, never removed)
//! └── root: NodeId
//! ```
//!
//! Element names are stored qualified (`auc:Facility`); lookups by path use
//! the local part so documents with a default namespace or a foreign prefix
//! navigate the same way.

use indexmap::IndexMap;

/// Handle to an element inside an [`XmlTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One XML element.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Qualified tag name as written (`prefix:local` or `local`).
    pub name: String,
    /// Attributes in document order, namespace declarations included.
    pub attributes: IndexMap<String, String>,
    /// Text content, if any.
    pub text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            text: None,
            parent,
            children: Vec::new(),
        }
    }

    /// Tag name without its prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Tag prefix, if the name is qualified.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }
}

/// Strip a `prefix:` from a qualified name.
pub fn local_name(qualified: &str) -> &str {
    qualified
        .split_once(':')
        .map(|(_, local)| local)
        .unwrap_or(qualified)
}

/// A mutable XML element tree.
#[derive(Clone, Debug, PartialEq)]
pub struct XmlTree {
    nodes: Vec<Element>,
    root: NodeId,
}

impl XmlTree {
    /// Create a tree holding only a root element.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Element::new(root_name, None)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn local_name(&self, id: NodeId) -> &str {
        self.nodes[id.0].local_name()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Child elements whose local name is `local`.
    pub fn children_named<'a>(
        &'a self,
        id: NodeId,
        local: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.local_name(child) == local)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].text.as_deref()
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.0].text = Some(text.into());
    }

    /// Append to the element's text (used while parsing split text events).
    pub fn push_text(&mut self, id: NodeId, text: &str) {
        match &mut self.nodes[id.0].text {
            Some(existing) => existing.push_str(text),
            slot @ None => *slot = Some(text.to_string()),
        }
    }

    /// Attribute by exact name, falling back to a match on the local part.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let attributes = &self.nodes[id.0].attributes;
        if let Some(value) = attributes.get(name) {
            return Some(value.as_str());
        }
        attributes
            .iter()
            .find(|(key, _)| !key.starts_with("xmlns") && local_name(key) == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        self.nodes[id.0].attributes.insert(name.into(), value.into());
    }

    /// Append a new child element at the end.
    pub fn append_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let index = self.nodes[parent.0].children.len();
        self.insert_child(parent, index, name)
    }

    /// Insert a new child element at `index` among the parent's children.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element::new(name, Some(parent)));
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, id);
        id
    }

    /// Namespace declarations on an element (`prefix -> uri`; default prefix is `""`).
    pub fn namespaces(&self, id: NodeId) -> IndexMap<&str, &str> {
        self.nodes[id.0]
            .attributes
            .iter()
            .filter_map(|(key, value)| {
                if key == "xmlns" {
                    Some(("", value.as_str()))
                } else {
                    key.strip_prefix("xmlns:").map(|prefix| (prefix, value.as_str()))
                }
            })
            .collect()
    }

    /// Local names from the root down to `id`, both inclusive.
    pub fn path_from_root(&self, id: NodeId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            names.push(self.local_name(node));
            current = self.parent(node);
        }
        names.reverse();
        names
    }

    /// Pre-order iterator over `id` and all its descendants.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Number of allocated elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Pre-order traversal driven by an explicit stack.
pub struct Descendants<'a> {
    tree: &'a XmlTree,
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
