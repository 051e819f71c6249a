// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML parsing via html5ever
//!
//! Full documents go through `parse_html`; fragment markup (the extracted
//! head/body blocks) goes through `parse_fragment`, which wraps the markup in
//! a dummy `<div>` so the fragment's top-level nodes stay queryable as one
//! subtree.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use url::Url;

use super::document::Document;
use super::element::Element;
use super::node::{NodeData, NodeId};
use crate::error::{Error, Result};

/// Parse an HTML string into a Document
pub fn parse_html(html: &str) -> Result<Document> {
    parse_html_with_url(html, None)
}

/// Parse an HTML string with a base URL
pub fn parse_html_with_url(html: &str, url: Option<Url>) -> Result<Document> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let rcdom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| Error::HtmlParse(e.to_string()))?;

    let doc = match url {
        Some(u) => Document::with_url(u),
        None => Document::new(),
    };

    let root_id = doc.root().id;
    for child in rcdom.document.children.borrow().iter() {
        convert(&doc, child, root_id);
    }

    // Locate <head> and <body> under <html>
    let mut head = None;
    let mut body = None;
    {
        let arena = doc.arena.read();
        let root_children = arena
            .get(&root_id)
            .map(|d| d.children.clone())
            .unwrap_or_default();
        for id in root_children {
            let Some(data) = arena.get(&id) else { continue };
            if data.tag_name.as_deref() == Some("html") {
                for &child in &data.children {
                    match arena.get(&child).and_then(|d| d.tag_name.as_deref()) {
                        Some("head") => head = Some(child),
                        Some("body") => body = Some(child),
                        _ => {}
                    }
                }
            }
        }
    }
    doc.set_structure(head, body);

    if let Some(title) = doc.query_selector("title") {
        doc.set_title(title.text_content());
    }

    Ok(doc)
}

/// Parse fragment markup, returning the wrapper element that holds it
pub fn parse_fragment(html: &str) -> Result<Element> {
    let doc = parse_html(&format!("<div>{}</div>", html))?;
    doc.query_selector("div")
        .ok_or_else(|| Error::HtmlParse("fragment wrapper not produced".to_string()))
}

fn convert(doc: &Document, handle: &Handle, parent_id: NodeId) -> Option<NodeId> {
    let data = match handle.data {
        RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return None,
        RcNodeData::Doctype { .. } => NodeData::doctype(),
        RcNodeData::Text { ref contents } => {
            let text = contents.borrow().to_string();
            if text.trim().is_empty() {
                return None;
            }
            NodeData::text(text)
        }
        RcNodeData::Comment { ref contents } => NodeData::comment(contents.to_string()),
        RcNodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let mut data = NodeData::element(name.local.to_string());
            for attr in attrs.borrow().iter() {
                data.set_attr(attr.name.local.to_string(), attr.value.to_string());
            }
            data
        }
    };

    let node_id = NodeId::new();
    {
        let mut arena = doc.arena.write();
        let mut data = data;
        data.parent = Some(parent_id);
        arena.insert(node_id, data);
        if let Some(parent) = arena.get_mut(&parent_id) {
            parent.children.push(node_id);
        }
    }

    for child in handle.children.borrow().iter() {
        convert(doc, child, node_id);
    }

    Some(node_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_structure() {
        let doc = parse_html(
            "<!DOCTYPE html><html><head><title>T</title></head><body><p>hi</p></body></html>",
        )
        .unwrap();
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.title(), "T");
    }

    #[test]
    fn test_parse_fragment_keeps_head_markup() {
        let frag = parse_fragment(
            "<title>T</title><link rel=\"stylesheet\" href=\"a.css\"><script src=\"x.js\"></script>",
        )
        .unwrap();
        assert!(frag.query_selector("title").is_some());
        assert!(frag.query_selector("link[rel=stylesheet]").is_some());
        assert!(frag.query_selector("script[src=\"x.js\"]").is_some());
    }

    #[test]
    fn test_parse_fragment_nested_divs() {
        let frag = parse_fragment("<div id=\"a\"><div id=\"b\">x</div></div>").unwrap();
        // the wrapper is the outermost div, fragment content is below it
        assert!(frag.query_selector("#a").is_some());
        assert!(frag.query_selector("#b").is_some());
        assert!(frag.id().is_none());
    }

    #[test]
    fn test_parse_attributes() {
        let doc = parse_html("<a href=\"/next\" target=\"_blank\">n</a>").unwrap();
        let a = doc.query_selector("a").unwrap();
        assert_eq!(a.href(), Some("/next".to_string()));
        assert_eq!(a.target(), Some("_blank".to_string()));
    }
}
