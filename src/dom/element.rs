// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Element-level DOM operations

use super::node::{Node, NodeArena, NodeId, NodeType};
use super::selector::Selector;

/// Element node with extended operations
#[derive(Debug, Clone)]
pub struct Element {
    /// Inner node handle
    pub node: Node,
}

impl Element {
    /// Wrap a node, returning None for non-element nodes
    pub fn new(node: Node) -> Option<Self> {
        if node.node_type() == NodeType::Element {
            Some(Self { node })
        } else {
            None
        }
    }

    pub(crate) fn from_id(id: NodeId, arena: NodeArena) -> Option<Self> {
        Self::new(Node::new(id, arena))
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> String {
        self.node.tag_name().unwrap_or_default()
    }

    /// Get the element's `id` attribute
    pub fn id(&self) -> Option<String> {
        self.node.get_attribute("id")
    }

    /// Get an attribute
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.node.get_attribute(name)
    }

    /// Set an attribute
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.node.set_attribute(name, value);
    }

    /// Remove an attribute
    pub fn remove_attribute(&self, name: &str) {
        self.node.remove_attribute(name);
    }

    /// Check if the element has an attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.node.has_attribute(name)
    }

    /// Get text content
    pub fn text_content(&self) -> String {
        self.node.text_content()
    }

    /// Get inner HTML
    pub fn inner_html(&self) -> String {
        self.node.inner_html()
    }

    /// Get outer HTML
    pub fn outer_html(&self) -> String {
        self.node.outer_html()
    }

    /// Get parent element
    pub fn parent_element(&self) -> Option<Element> {
        self.node.parent().and_then(Element::new)
    }

    /// Get child elements (element nodes only)
    pub fn children(&self) -> Vec<Element> {
        self.node
            .children()
            .into_iter()
            .filter_map(Element::new)
            .collect()
    }

    /// Check if this element matches a selector
    pub fn matches(&self, selector: &str) -> bool {
        Selector::parse(selector)
            .map(|sel| sel.matches(&self.node))
            .unwrap_or(false)
    }

    /// Find the first descendant (or self) matching a selector
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        let sel = Selector::parse(selector).ok()?;
        self.find_first(&sel)
    }

    /// Find all descendants (or self) matching a selector
    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        let mut out = Vec::new();
        if let Ok(sel) = Selector::parse(selector) {
            self.collect_matching(&sel, &mut out);
        }
        out
    }

    fn find_first(&self, sel: &Selector) -> Option<Element> {
        if sel.matches(&self.node) {
            return Some(self.clone());
        }
        self.children().into_iter().find_map(|c| c.find_first(sel))
    }

    fn collect_matching(&self, sel: &Selector, out: &mut Vec<Element>) {
        if sel.matches(&self.node) {
            out.push(self.clone());
        }
        for child in self.children() {
            child.collect_matching(sel, out);
        }
    }

    /// Get `href` for anchors and stylesheet links
    pub fn href(&self) -> Option<String> {
        self.get_attribute("href")
    }

    /// Get `src` for scripts, images and similar
    pub fn src(&self) -> Option<String> {
        self.get_attribute("src")
    }

    /// Get `target` for anchors
    pub fn target(&self) -> Option<String> {
        self.get_attribute("target")
    }

    /// Check whether this is a stylesheet `<link>`
    pub fn is_stylesheet_link(&self) -> bool {
        self.tag_name() == "link"
            && self
                .get_attribute("rel")
                .map(|rel| rel.split_whitespace().any(|w| w.eq_ignore_ascii_case("stylesheet")))
                .unwrap_or(false)
    }
}

impl std::ops::Deref for Element {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}
