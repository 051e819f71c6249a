// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Document representation
//!
//! `Document` is a cheap handle: clones share the node arena, so the
//! navigation controller, its timer tasks and callers all see one tree.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use url::Url;

use super::element::Element;
use super::node::{Node, NodeArena, NodeData, NodeId, NodeType};
use super::selector::Selector;

/// HTML document backed by a shared node arena
#[derive(Debug, Clone)]
pub struct Document {
    /// Document URL
    url: Arc<RwLock<Option<Url>>>,
    /// Document title
    title: Arc<RwLock<String>>,
    /// Root node ID
    root_id: NodeId,
    /// Node storage
    pub(crate) arena: NodeArena,
    /// Head element ID
    head_id: Arc<RwLock<Option<NodeId>>>,
    /// Body element ID
    body_id: Arc<RwLock<Option<NodeId>>>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        let root_id = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, NodeData::document());

        Self {
            url: Arc::new(RwLock::new(None)),
            title: Arc::new(RwLock::new(String::new())),
            root_id,
            arena: Arc::new(RwLock::new(nodes)),
            head_id: Arc::new(RwLock::new(None)),
            body_id: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a document with a URL
    pub fn with_url(url: Url) -> Self {
        let doc = Self::new();
        *doc.url.write() = Some(url);
        doc
    }

    /// Get the document URL
    pub fn url(&self) -> Option<Url> {
        self.url.read().clone()
    }

    /// Set the document URL
    pub fn set_url(&self, url: Url) {
        *self.url.write() = Some(url);
    }

    /// Get the document title
    pub fn title(&self) -> String {
        self.title.read().clone()
    }

    /// Set the document title, updating any `<title>` element
    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        if let Some(title_el) = self.query_selector("title") {
            let text = self.create_text_node(&title);
            title_el.node.replace_children(&[text]);
        }
        *self.title.write() = title;
    }

    /// Get the root node
    pub fn root(&self) -> Node {
        Node::new(self.root_id, self.arena.clone())
    }

    /// Get the `<head>` element
    pub fn head(&self) -> Option<Element> {
        self.head_id
            .read()
            .and_then(|id| Element::from_id(id, self.arena.clone()))
    }

    /// Get the `<body>` element
    pub fn body(&self) -> Option<Element> {
        self.body_id
            .read()
            .and_then(|id| Element::from_id(id, self.arena.clone()))
    }

    pub(crate) fn set_structure(&self, head: Option<NodeId>, body: Option<NodeId>) {
        *self.head_id.write() = head;
        *self.body_id.write() = body;
    }

    /// Find the first element matching a selector
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        let sel = Selector::parse(selector).ok()?;
        let id = {
            let arena = self.arena.read();
            let mut ids = Vec::new();
            collect_matches(&arena, self.root_id, &sel, &mut ids, false);
            ids.into_iter().next()
        };
        id.and_then(|id| Element::from_id(id, self.arena.clone()))
    }

    /// Find all elements matching a selector
    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        let Ok(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        let ids = {
            let arena = self.arena.read();
            let mut ids = Vec::new();
            collect_matches(&arena, self.root_id, &sel, &mut ids, true);
            ids
        };
        ids.into_iter()
            .filter_map(|id| Element::from_id(id, self.arena.clone()))
            .collect()
    }

    /// Get an element by its `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.query_selector(&format!("#{}", id))
    }

    /// Get all anchors carrying an `href`
    pub fn links(&self) -> Vec<Element> {
        self.query_selector_all("a[href]")
    }

    /// Get all stylesheet links
    pub fn stylesheets(&self) -> Vec<Element> {
        self.query_selector_all("link[rel=stylesheet]")
    }

    /// Create a detached element in this document
    pub fn create_element(&self, tag: &str) -> Element {
        let id = NodeId::new();
        self.arena.write().insert(id, NodeData::element(tag));
        Element::from_id(id, self.arena.clone())
            .unwrap_or_else(|| unreachable!("freshly created element"))
    }

    /// Create a detached text node in this document
    pub fn create_text_node(&self, content: &str) -> Node {
        let id = NodeId::new();
        self.arena.write().insert(id, NodeData::text(content));
        Node::new(id, self.arena.clone())
    }

    /// Deep-copy a node (possibly from another document) into this document.
    /// The returned node is detached.
    ///
    /// Same-arena imports clone under a single write guard; distinct arenas
    /// are locked in address order so two imports running in opposite
    /// directions cannot deadlock.
    pub fn import_node(&self, foreign: &Node) -> Node {
        let new_id = if Arc::ptr_eq(&self.arena, &foreign.arena) {
            let mut arena = self.arena.write();
            clone_within(&mut arena, foreign.id, None)
        } else if (Arc::as_ptr(&foreign.arena) as usize) < (Arc::as_ptr(&self.arena) as usize) {
            let source = foreign.arena.read();
            let mut target = self.arena.write();
            clone_into(&source, &mut target, foreign.id, None)
        } else {
            let mut target = self.arena.write();
            let source = foreign.arena.read();
            clone_into(&source, &mut target, foreign.id, None)
        };
        Node::new(new_id, self.arena.clone())
    }

    /// Serialize the whole document
    pub fn outer_html(&self) -> String {
        self.root().outer_html()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// Matching runs against the borrowed node data under the caller's single
// read guard; nothing in here takes a second lock.
fn collect_matches(
    arena: &HashMap<NodeId, NodeData>,
    id: NodeId,
    sel: &Selector,
    out: &mut Vec<NodeId>,
    all: bool,
) {
    let Some(data) = arena.get(&id) else { return };
    if data.node_type == NodeType::Element && sel.matches_data(data) {
        out.push(id);
        if !all {
            return;
        }
    }
    for &child in &data.children {
        if !all && !out.is_empty() {
            return;
        }
        collect_matches(arena, child, sel, out, all);
    }
}

fn clone_into(
    source: &HashMap<NodeId, NodeData>,
    target: &mut HashMap<NodeId, NodeData>,
    id: NodeId,
    parent: Option<NodeId>,
) -> NodeId {
    let new_id = NodeId::new();
    let (mut data, children) = match source.get(&id) {
        Some(d) => {
            let mut copy = d.clone();
            let children = std::mem::take(&mut copy.children);
            (copy, children)
        }
        None => (NodeData::text(""), Vec::new()),
    };
    data.parent = parent;
    target.insert(new_id, data);

    let new_children: Vec<NodeId> = children
        .iter()
        .map(|&child| clone_into(source, target, child, Some(new_id)))
        .collect();
    if let Some(d) = target.get_mut(&new_id) {
        d.children = new_children;
    }
    new_id
}

fn clone_within(
    arena: &mut HashMap<NodeId, NodeData>,
    id: NodeId,
    parent: Option<NodeId>,
) -> NodeId {
    let new_id = NodeId::new();
    let (mut data, children) = match arena.get(&id) {
        Some(d) => {
            let mut copy = d.clone();
            let children = std::mem::take(&mut copy.children);
            (copy, children)
        }
        None => (NodeData::text(""), Vec::new()),
    };
    data.parent = parent;
    arena.insert(new_id, data);

    let new_children: Vec<NodeId> = children
        .iter()
        .map(|&child| clone_within(arena, child, Some(new_id)))
        .collect();
    if let Some(d) = arena.get_mut(&new_id) {
        d.children = new_children;
    }
    new_id
}
