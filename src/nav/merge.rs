// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM merging for a navigation
//!
//! Head content is appended next to the old (marker-tagged) children so the
//! page keeps its styles until the new stylesheets are ready; body content is
//! spliced selector by selector, in list order, skipping what cannot be
//! matched. Partial application is allowed by contract.

use tracing::warn;

use crate::dom::{Document, Element, Node};
use crate::error::{Error, Result};

use super::fragment::PageFragments;
use super::gate::StylesheetGate;

/// Transitional marker carried by head children scheduled for removal
pub const OLD_HEAD_MARKER: &str = "softnav-old";

/// An in-progress head merge with its stylesheet gate
pub struct HeadMerge {
    /// Gate over the stylesheets the new head introduced
    pub gate: StylesheetGate,
    /// Hrefs of the stylesheets the gate tracks, in document order
    pub stylesheet_hrefs: Vec<String>,
}

/// Mark the current head children as old and append the new head content.
///
/// Old nodes stay in place until [`finish_head_merge`] so existing styles
/// keep applying while the new stylesheets load.
pub fn begin_head_merge(live: &Document, new_head: &Element) -> Result<HeadMerge> {
    let head = live
        .head()
        .ok_or_else(|| Error::dom("live document has no <head>"))?;

    for child in head.children() {
        child.set_attribute(OLD_HEAD_MARKER, "");
    }

    let mut stylesheet_hrefs = Vec::new();
    for child in new_head.node.children() {
        let imported = live.import_node(&child);
        head.node.append_child(&imported);
        if let Some(el) = Element::new(imported) {
            if el.is_stylesheet_link() {
                if let Some(href) = el.href() {
                    stylesheet_hrefs.push(href);
                }
            }
        }
    }

    Ok(HeadMerge {
        gate: StylesheetGate::new(stylesheet_hrefs.len()),
        stylesheet_hrefs,
    })
}

/// Drop the old-marked head nodes and refresh the document title
pub fn finish_head_merge(live: &Document) {
    for el in live.query_selector_all(&format!("[{}]", OLD_HEAD_MARKER)) {
        el.node.detach();
    }
    if let Some(title) = live.query_selector("title") {
        let text = title.text_content();
        live.set_title(text);
    }
}

/// Replace the head content synchronously (no stylesheet gating)
pub fn replace_head_now(live: &Document, new_head: &Element) -> Result<()> {
    let head = live
        .head()
        .ok_or_else(|| Error::dom("live document has no <head>"))?;

    head.node.clear_children();
    for child in new_head.node.children() {
        let imported = live.import_node(&child);
        head.node.append_child(&imported);
    }
    if let Some(title) = live.query_selector("title") {
        let text = title.text_content();
        live.set_title(text);
    }
    Ok(())
}

/// Update only the document title from the fetched fragments.
///
/// Falls back from the fetched head to the fetched body, and finally to the
/// URL itself with a logged warning.
pub fn update_title(live: &Document, fragments: &PageFragments, url: &str) {
    let title = fragments
        .head
        .query_selector("title")
        .or_else(|| fragments.body.query_selector("title"))
        .map(|el| el.text_content())
        .filter(|t| !t.is_empty());

    match title {
        Some(t) => live.set_title(t),
        None => {
            warn!(url, "no <title> in fetched page, using URL as title");
            live.set_title(url);
        }
    }
}

/// Result of the body merge step
#[derive(Debug, Default)]
pub struct BodyMergeOutcome {
    /// Selectors whose content was replaced, in application order
    pub replaced: Vec<String>,
    /// Selectors skipped because live or fetched content was missing
    pub skipped: Vec<String>,
}

/// Splice fetched body content into the live document, selector by selector
pub fn merge_body(
    live: &Document,
    fetched_body: &Element,
    selectors: &[String],
) -> BodyMergeOutcome {
    let mut outcome = BodyMergeOutcome::default();

    for selector in selectors {
        let Some(live_el) = live.query_selector(selector) else {
            warn!(selector, "element not found in live document, skipping");
            outcome.skipped.push(selector.clone());
            continue;
        };
        let Some(new_el) = fetched_body.query_selector(selector) else {
            warn!(selector, "element not found in fetched page, skipping");
            outcome.skipped.push(selector.clone());
            continue;
        };

        let imported: Vec<Node> = new_el
            .node
            .children()
            .iter()
            .map(|child| live.import_node(child))
            .collect();
        live_el.node.replace_children(&imported);
        outcome.replaced.push(selector.clone());
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, parse_html};
    use crate::nav::fragment::extract_fragments;

    fn live_page() -> Document {
        parse_html(
            "<html><head><title>Old</title><link rel=\"stylesheet\" href=\"old.css\"></head>\
             <body><div id=\"a\">old-a</div><div id=\"c\">old-c</div></body></html>",
        )
        .unwrap()
    }

    #[test]
    fn test_head_merge_keeps_old_until_finished() {
        let live = live_page();
        let new_head = parse_fragment(
            "<title>New</title><link rel=\"stylesheet\" href=\"n1.css\">\
             <link rel=\"stylesheet\" href=\"n2.css\">",
        )
        .unwrap();

        let merge = begin_head_merge(&live, &new_head).unwrap();
        assert_eq!(merge.gate.total(), 2);
        assert_eq!(merge.stylesheet_hrefs, vec!["n1.css", "n2.css"]);

        // old nodes still present and marked
        assert!(live.query_selector("link[href=\"old.css\"]").is_some());
        assert_eq!(
            live.query_selector_all(&format!("[{}]", OLD_HEAD_MARKER)).len(),
            2
        );

        finish_head_merge(&live);
        assert!(live.query_selector("link[href=\"old.css\"]").is_none());
        assert!(live.query_selector("link[href=\"n1.css\"]").is_some());
        assert_eq!(live.title(), "New");
    }

    #[test]
    fn test_gated_merge_defers_body_until_all_css_loaded() {
        let live = live_page();
        let frags = extract_fragments(
            "<head><link rel=\"stylesheet\" href=\"n1.css\">\
             <link rel=\"stylesheet\" href=\"n2.css\"></head>\
             <body><div id=\"a\">new-a</div></body>",
            "u",
        )
        .unwrap();

        let mut merge = begin_head_merge(&live, &frags.head).unwrap();
        let selectors = vec!["#a".to_string()];

        // one of two stylesheets loaded: body must stay untouched
        assert!(!merge.gate.notify_loaded());
        assert_eq!(
            live.query_selector("#a").unwrap().text_content(),
            "old-a"
        );

        // second completion opens the gate
        assert!(merge.gate.notify_loaded());
        finish_head_merge(&live);
        let outcome = merge_body(&live, &frags.body, &selectors);
        assert_eq!(outcome.replaced, vec!["#a"]);
        assert_eq!(live.query_selector("#a").unwrap().text_content(), "new-a");
    }

    #[test]
    fn test_replace_head_now() {
        let live = live_page();
        let new_head = parse_fragment("<title>Sync</title>").unwrap();
        replace_head_now(&live, &new_head).unwrap();
        assert!(live.query_selector("link[href=\"old.css\"]").is_none());
        assert_eq!(live.title(), "Sync");
    }

    #[test]
    fn test_body_merge_skips_missing_selectors() {
        let live = live_page();
        let fetched = parse_fragment(
            "<div id=\"a\">new-a</div><div id=\"b\">new-b</div>",
        )
        .unwrap();

        let selectors = vec!["#a".to_string(), "#b".to_string()];
        let outcome = merge_body(&live, &fetched, &selectors);

        assert_eq!(outcome.replaced, vec!["#a"]);
        assert_eq!(outcome.skipped, vec!["#b"]);
        assert_eq!(live.query_selector("#a").unwrap().text_content(), "new-a");
        // #c untouched
        assert_eq!(live.query_selector("#c").unwrap().text_content(), "old-c");
    }

    #[test]
    fn test_body_merge_skips_selector_missing_in_fetched_page() {
        let live = live_page();
        let fetched = parse_fragment("<div id=\"a\">new-a</div>").unwrap();
        let selectors = vec!["#c".to_string(), "#a".to_string()];
        let outcome = merge_body(&live, &fetched, &selectors);
        assert_eq!(outcome.skipped, vec!["#c"]);
        assert_eq!(outcome.replaced, vec!["#a"]);
        assert_eq!(live.query_selector("#c").unwrap().text_content(), "old-c");
    }

    #[test]
    fn test_update_title_fallbacks() {
        let live = live_page();

        let frags = extract_fragments(
            "<head><title>FromHead</title></head><body></body>",
            "u",
        )
        .unwrap();
        update_title(&live, &frags, "https://e.com/x");
        assert_eq!(live.title(), "FromHead");

        let frags = extract_fragments(
            "<head></head><body><title>FromBody</title></body>",
            "u",
        )
        .unwrap();
        update_title(&live, &frags, "https://e.com/x");
        assert_eq!(live.title(), "FromBody");

        let frags = extract_fragments("<head></head><body>plain</body>", "u").unwrap();
        update_title(&live, &frags, "https://e.com/x");
        assert_eq!(live.title(), "https://e.com/x");
    }
}
