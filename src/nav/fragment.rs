// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fragment extraction from fetched markup
//!
//! The head/body blocks are cut out of the raw response text with a
//! dot-matches-newline, non-greedy regex before any DOM work happens. This
//! is a deliberate boundary: documents whose head/body markup hides inside
//! strings or comments are outside the contract, and a missing block is a
//! typed, fatal error for that navigation.

use std::sync::OnceLock;

use regex::Regex;

use crate::dom::{parse_fragment, Document, Element};
use crate::error::{Error, Result};

use super::config::{IGNORE_MARKER_ATTR, LIBRARY_MARKER_ATTR};

/// Parsed head and body fragments of a fetched page
#[derive(Debug)]
pub struct PageFragments {
    /// Wrapper element holding the head markup
    pub head: Element,
    /// Wrapper element holding the body markup
    pub body: Element,
}

fn head_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<head[^>]*>(.*?)</head\s*>").unwrap())
}

fn body_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<body[^>]*>(.*?)</body\s*>").unwrap())
}

/// Extract and parse the first head and body blocks of `html`.
///
/// `url` is carried into the error for diagnostics.
pub fn extract_fragments(html: &str, url: &str) -> Result<PageFragments> {
    let head_inner = head_re()
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or_else(|| Error::missing_fragment("head", url))?
        .as_str();
    let body_inner = body_re()
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or_else(|| Error::missing_fragment("body", url))?
        .as_str();

    Ok(PageFragments {
        head: parse_fragment(head_inner)?,
        body: parse_fragment(body_inner)?,
    })
}

/// Remove elements bearing a reserved marker attribute from `fragment`.
///
/// Marked elements that already exist in the live document under an
/// equivalent selector are preserved: same tag name, and for `<script>`
/// the same `src`, so side-effecting resources are never loaded twice.
pub fn strip_reserved_markers(fragment: &Element, live: &Document) {
    let mut marked = fragment.query_selector_all(&format!("[{}]", LIBRARY_MARKER_ATTR));
    marked.extend(fragment.query_selector_all(&format!("[{}]", IGNORE_MARKER_ATTR)));

    for el in marked {
        if has_live_equivalent(live, &el) {
            continue;
        }
        el.node.detach();
    }
}

fn has_live_equivalent(live: &Document, el: &Element) -> bool {
    let tag = el.tag_name();
    if tag == "script" {
        let src = el.src();
        live.query_selector_all("script")
            .iter()
            .any(|s| s.src() == src)
    } else {
        live.query_selector(&tag).is_some()
    }
}
