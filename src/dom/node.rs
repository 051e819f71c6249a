// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM node types
//!
//! Nodes live in a per-document arena keyed by `NodeId`. A `Node` is a cheap
//! handle (id + shared arena) so subtrees can be walked and mutated from the
//! navigation controller and its timer tasks alike.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared node arena
pub(crate) type NodeArena = Arc<RwLock<HashMap<NodeId, NodeData>>>;

/// Unique node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a new unique node ID
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Document node
    Document,
    /// Element node
    Element,
    /// Text node
    Text,
    /// Comment node
    Comment,
    /// <!DOCTYPE> node
    DocumentType,
}

/// Internal node data
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Node type
    pub node_type: NodeType,
    /// Tag name (elements only, stored lowercase)
    pub tag_name: Option<String>,
    /// Text content (text/comment nodes)
    pub text: Option<String>,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Parent node ID
    pub parent: Option<NodeId>,
    /// Child node IDs in order
    pub children: Vec<NodeId>,
}

impl NodeData {
    /// Create element node data
    pub fn element(tag_name: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Element,
            tag_name: Some(tag_name.into().to_lowercase()),
            text: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create text node data
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Text,
            tag_name: None,
            text: Some(content.into()),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create comment node data
    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Comment,
            tag_name: None,
            text: Some(content.into()),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create document node data
    pub fn document() -> Self {
        Self {
            node_type: NodeType::Document,
            tag_name: None,
            text: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a doctype node data
    pub fn doctype() -> Self {
        Self {
            node_type: NodeType::DocumentType,
            tag_name: None,
            text: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by (lowercase) name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or overwrite an attribute
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }
}

/// A handle to a node in the DOM tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Node ID
    pub id: NodeId,
    /// Owning document's arena
    pub(crate) arena: NodeArena,
}

impl Node {
    /// Create a new node handle
    pub(crate) fn new(id: NodeId, arena: NodeArena) -> Self {
        Self { id, arena }
    }

    /// Get the node type
    pub fn node_type(&self) -> NodeType {
        self.arena
            .read()
            .get(&self.id)
            .map(|n| n.node_type)
            .unwrap_or(NodeType::Element)
    }

    /// Get the tag name in lowercase
    pub fn tag_name(&self) -> Option<String> {
        self.arena
            .read()
            .get(&self.id)
            .and_then(|n| n.tag_name.clone())
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type() == NodeType::Text
    }

    /// Get concatenated text content of the subtree
    pub fn text_content(&self) -> String {
        let arena = self.arena.read();
        collect_text(&arena, self.id)
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.arena
            .read()
            .get(&self.id)
            .and_then(|n| n.attr(&name.to_lowercase()).map(String::from))
    }

    /// Set an attribute value
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Some(node) = self.arena.write().get_mut(&self.id) {
            node.set_attr(name, value);
        }
    }

    /// Remove an attribute
    pub fn remove_attribute(&self, name: &str) {
        let name = name.to_lowercase();
        if let Some(node) = self.arena.write().get_mut(&self.id) {
            node.attributes.retain(|(k, _)| *k != name);
        }
    }

    /// Check if the node has an attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.arena
            .read()
            .get(&self.id)
            .map(|n| n.attr(&name.to_lowercase()).is_some())
            .unwrap_or(false)
    }

    /// Get parent node
    pub fn parent(&self) -> Option<Node> {
        self.arena
            .read()
            .get(&self.id)
            .and_then(|n| n.parent)
            .map(|id| Node::new(id, self.arena.clone()))
    }

    /// Get child nodes in order
    pub fn children(&self) -> Vec<Node> {
        self.arena
            .read()
            .get(&self.id)
            .map(|n| {
                n.children
                    .iter()
                    .map(|&id| Node::new(id, self.arena.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of children
    pub fn child_count(&self) -> usize {
        self.arena
            .read()
            .get(&self.id)
            .map(|n| n.children.len())
            .unwrap_or(0)
    }

    /// Append a child node (detaching it from any previous parent)
    pub fn append_child(&self, child: &Node) {
        self.insert_child_at(child, usize::MAX);
    }

    /// Prepend a child node (detaching it from any previous parent)
    pub fn prepend_child(&self, child: &Node) {
        self.insert_child_at(child, 0);
    }

    fn insert_child_at(&self, child: &Node, index: usize) {
        let mut arena = self.arena.write();

        let old_parent = arena.get(&child.id).and_then(|d| d.parent);
        if let Some(old_pid) = old_parent {
            if let Some(old) = arena.get_mut(&old_pid) {
                old.children.retain(|&id| id != child.id);
            }
        }

        if let Some(child_data) = arena.get_mut(&child.id) {
            child_data.parent = Some(self.id);
        }

        if let Some(parent_data) = arena.get_mut(&self.id) {
            let index = index.min(parent_data.children.len());
            parent_data.children.insert(index, child.id);
        }
    }

    /// Detach this node from its parent, dropping its arena entries
    pub fn detach(&self) {
        let mut arena = self.arena.write();
        if let Some(parent_id) = arena.get(&self.id).and_then(|d| d.parent) {
            if let Some(parent) = arena.get_mut(&parent_id) {
                parent.children.retain(|&id| id != self.id);
            }
        }
        drop_subtree(&mut arena, self.id);
    }

    /// Remove all children of this node, dropping their arena entries
    pub fn clear_children(&self) {
        let mut arena = self.arena.write();
        let children = arena
            .get_mut(&self.id)
            .map(|d| std::mem::take(&mut d.children))
            .unwrap_or_default();
        for child_id in children {
            drop_subtree(&mut arena, child_id);
        }
    }

    /// Replace all children with the given nodes, in order
    pub fn replace_children(&self, new_children: &[Node]) {
        self.clear_children();
        for child in new_children {
            self.append_child(child);
        }
    }

    /// Serialize children to HTML
    pub fn inner_html(&self) -> String {
        let arena = self.arena.read();
        arena
            .get(&self.id)
            .map(|n| {
                n.children
                    .iter()
                    .map(|&id| serialize(&arena, id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Serialize this node and its subtree to HTML
    pub fn outer_html(&self) -> String {
        let arena = self.arena.read();
        serialize(&arena, self.id)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

fn collect_text(arena: &HashMap<NodeId, NodeData>, id: NodeId) -> String {
    match arena.get(&id) {
        Some(node) => match node.node_type {
            NodeType::Text => node.text.clone().unwrap_or_default(),
            NodeType::Element | NodeType::Document => node
                .children
                .iter()
                .map(|&child| collect_text(arena, child))
                .collect(),
            _ => String::new(),
        },
        None => String::new(),
    }
}

fn drop_subtree(arena: &mut HashMap<NodeId, NodeData>, id: NodeId) {
    if let Some(data) = arena.remove(&id) {
        for child in data.children {
            drop_subtree(arena, child);
        }
    }
}

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

fn serialize(arena: &HashMap<NodeId, NodeData>, id: NodeId) -> String {
    let Some(node) = arena.get(&id) else {
        return String::new();
    };
    match node.node_type {
        NodeType::Text => node.text.clone().unwrap_or_default(),
        NodeType::Comment => format!("<!--{}-->", node.text.as_deref().unwrap_or("")),
        NodeType::DocumentType => "<!DOCTYPE html>".to_string(),
        NodeType::Element => {
            let tag = node.tag_name.as_deref().unwrap_or("div");
            let mut out = String::new();
            out.push('<');
            out.push_str(tag);
            for (name, value) in &node.attributes {
                out.push(' ');
                out.push_str(name);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
            }
            out.push('>');
            if !VOID_ELEMENTS.contains(&tag) {
                for &child in &node.children {
                    out.push_str(&serialize(arena, child));
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            out
        }
        NodeType::Document => node
            .children
            .iter()
            .map(|&child| serialize(arena, child))
            .collect(),
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}
