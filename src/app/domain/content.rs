//! Rendered content tree.
//!
//! An arena of element and text nodes standing in for the host's rendered
//! preview. Structural changes (insertions and removals) are appended to a
//! mutation log that observers drain, the same way a DOM mutation observer
//! receives batched records.
//!
//! `NodeId`s are only meaningful for the tree that created them. Removed
//! nodes stay in the arena until the tree is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element {
        tag: String,
        classes: Vec<String>,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// One structural change: `added` were inserted under `target`, `removed`
/// were taken out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

#[derive(Debug)]
pub struct ContentTree {
    id: TreeId,
    nodes: Vec<Node>,
    root: NodeId,
    mutations: Vec<MutationRecord>,
}

impl ContentTree {
    pub fn new(root_tag: &str) -> Self {
        let root = Node {
            kind: NodeKind::Element {
                tag: root_tag.to_string(),
                classes: Vec::new(),
                attrs: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            id: TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed)),
            nodes: vec![root],
            root: NodeId(0),
            mutations: Vec::new(),
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_string(),
            classes: Vec::new(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached element carrying the given classes.
    pub fn create_element_with_classes(&mut self, tag: &str, classes: &[&str]) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(id).kind {
            match attrs.iter_mut().find(|(n, _)| n == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let NodeKind::Element { classes, .. } = &mut self.node_mut(id).kind {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Text of a text node, `None` for elements.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Append to the text of a text node. Not a structural change.
    pub fn push_text(&mut self, id: NodeId, more: &str) {
        if let NodeKind::Text(text) = &mut self.node_mut(id).kind {
            text.push_str(more);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        match &self.node(id).kind {
            NodeKind::Element { classes, .. } => classes.iter().any(|c| c == class),
            NodeKind::Text(_) => false,
        }
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.node(child).parent {
            self.node_mut(parent).children.retain(|&c| c != child);
            self.node_mut(child).parent = None;
        }
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old_parent) = self.node(child).parent {
            self.detach(child);
            self.mutations.push(MutationRecord {
                target: old_parent,
                added: Vec::new(),
                removed: vec![child],
            });
        }
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
        self.mutations.push(MutationRecord {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
    }

    /// Replace `old` in its parent with `replacement`, in order.
    ///
    /// Returns false (and changes nothing) when `old` is detached.
    pub fn replace_with(&mut self, old: NodeId, replacement: Vec<NodeId>) -> bool {
        let Some(parent) = self.node(old).parent else {
            return false;
        };
        for &id in &replacement {
            self.detach(id);
        }
        let Some(position) = self.node(parent).children.iter().position(|&c| c == old) else {
            return false;
        };
        for &id in &replacement {
            self.node_mut(id).parent = Some(parent);
        }
        self.node_mut(parent)
            .children
            .splice(position..=position, replacement.iter().copied());
        self.node_mut(old).parent = None;
        self.mutations.push(MutationRecord {
            target: parent,
            added: replacement,
            removed: vec![old],
        });
        true
    }

    /// Detach `id` from its parent.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.detach(id);
            self.mutations.push(MutationRecord {
                target: parent,
                added: Vec::new(),
                removed: vec![id],
            });
        }
    }

    /// True when `node` is `ancestor` or lies beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Pre-order walk of `from` and its descendants.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    /// Text leaves under `from`, in document order.
    pub fn text_nodes(&self, from: NodeId) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|&id| matches!(self.node(id).kind, NodeKind::Text(_)))
            .collect()
    }

    /// First element at or below `from` carrying `class`.
    pub fn find_by_class(&self, from: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(from)
            .into_iter()
            .find(|&id| self.has_class(id, class))
    }

    /// Every element at or below `from` carrying `class`.
    pub fn find_all_by_class(&self, from: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// Concatenated text of all leaves under `from`.
    pub fn text_content(&self, from: NodeId) -> String {
        self.text_nodes(from)
            .into_iter()
            .filter_map(|id| self.text(id))
            .collect()
    }

    pub fn has_pending_mutations(&self) -> bool {
        !self.mutations.is_empty()
    }

    /// Drain the mutation log.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.mutations)
    }

    /// Serialize `from` and its subtree as HTML.
    pub fn to_html(&self, from: NodeId) -> String {
        let mut out = String::new();
        self.write_html(from, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text(text) => out.push_str(&escape_html(text)),
            NodeKind::Element { tag, classes, attrs } => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", escape_html(&classes.join(" "))));
                }
                for (name, value) in attrs {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
                }
                if is_void_element(tag) {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for &child in &self.node(id).children {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

fn is_void_element(tag: &str) -> bool {
    matches!(tag, "br" | "hr" | "img" | "input")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
