// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Progress indicator
//!
//! A DOM element carrying a `status` attribute (`waiting` | `done`) and a
//! percentage width style. The controller creates a default one prepended to
//! `<body>` when the configured selector matches nothing.

use tracing::debug;

use crate::dom::{Document, Element};
use crate::error::{Error, Result};

/// Indicator status while a navigation is in flight
pub const STATUS_WAITING: &str = "waiting";
/// Indicator status once a navigation has settled
pub const STATUS_DONE: &str = "done";

/// Delay before the indicator is marked done, in milliseconds
pub const DONE_DELAY_MS: u64 = 250;
/// Delay before the indicator width collapses to 0%, in milliseconds
pub const RESET_DELAY_MS: u64 = 600;

/// Minimum visible width while downloading, in percent
const MIN_VISIBLE_PERCENT: u32 = 30;
/// Overshoot width applied when the download finishes, in percent
const OVERSHOOT_PERCENT: u32 = 105;

/// Handle to the progress indicator element
#[derive(Clone)]
pub struct ProgressBar {
    element: Element,
    enabled: bool,
}

impl ProgressBar {
    /// Locate the indicator by selector, creating a default element
    /// prepended to `<body>` when the selector matches nothing.
    pub fn ensure(document: &Document, query: &str, enabled: bool) -> Result<Self> {
        let element = match document.query_selector(query) {
            Some(el) => el,
            None => {
                let body = document
                    .body()
                    .ok_or_else(|| Error::dom("document has no <body> to hold the indicator"))?;
                let el = document.create_element("div");
                el.set_attribute("id", default_id(query));
                body.node.prepend_child(&el.node);
                debug!(query, "progress indicator created");
                el
            }
        };
        let bar = Self { element, enabled };
        bar.element.set_attribute("status", STATUS_WAITING);
        Ok(bar)
    }

    /// Mark a navigation as started
    pub fn set_waiting(&self) {
        if self.enabled {
            self.element.set_attribute("status", STATUS_WAITING);
        }
    }

    /// Mark the navigation as settled
    pub fn set_done(&self) {
        if self.enabled {
            self.element.set_attribute("status", STATUS_DONE);
        }
    }

    /// Update width from streamed download progress
    pub fn on_download_progress(&self, loaded: u64, total: Option<u64>) {
        if let Some(total) = total {
            self.set_width_percent(width_percent(loaded, total));
        }
        // no computable length: leave the width where it is
    }

    /// Apply the overshoot cue once the body has arrived
    pub fn overshoot(&self) {
        self.set_width_percent(OVERSHOOT_PERCENT);
    }

    /// Collapse the indicator
    pub fn collapse(&self) {
        self.set_width_percent(0);
    }

    fn set_width_percent(&self, percent: u32) {
        if self.enabled {
            self.element
                .set_attribute("style", format!("width: {}%", percent));
        }
    }

    /// Current status attribute value
    pub fn status(&self) -> Option<String> {
        self.element.get_attribute("status")
    }

    /// Current width style value
    pub fn width_style(&self) -> Option<String> {
        self.element.get_attribute("style")
    }
}

/// Indicator width for a download at `loaded` of `total` bytes.
///
/// The percentage is scaled to 0-100 and floored at 30% so the bar stays
/// visible from the first chunk.
pub fn width_percent(loaded: u64, total: u64) -> u32 {
    if total == 0 {
        return MIN_VISIBLE_PERCENT;
    }
    let percent = ((loaded as f64 / total as f64) * 100.0).round() as u32;
    percent.max(MIN_VISIBLE_PERCENT)
}

fn default_id(query: &str) -> &str {
    query.strip_prefix('#').unwrap_or("link-progress-bar")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_creates_default_indicator_prepended() {
        let doc = parse_html("<html><body><main>x</main></body></html>").unwrap();
        let bar = ProgressBar::ensure(&doc, "#link-progress-bar", true).unwrap();
        assert_eq!(bar.status().as_deref(), Some(STATUS_WAITING));

        let body = doc.body().unwrap();
        let first = body.children().into_iter().next().unwrap();
        assert_eq!(first.id().as_deref(), Some("link-progress-bar"));
        assert_eq!(doc.query_selector_all("#link-progress-bar").len(), 1);
    }

    #[test]
    fn test_reuses_existing_indicator() {
        let doc = parse_html(
            "<html><body><div id=\"bar\"></div><main>x</main></body></html>",
        )
        .unwrap();
        let bar = ProgressBar::ensure(&doc, "#bar", true).unwrap();
        bar.overshoot();
        assert_eq!(doc.query_selector_all("#bar").len(), 1);
        assert_eq!(
            doc.query_selector("#bar").unwrap().get_attribute("style"),
            Some("width: 105%".to_string())
        );
    }

    #[test]
    fn test_width_percent_scale_and_floor() {
        assert_eq!(width_percent(0, 100), 30);
        assert_eq!(width_percent(10, 100), 30);
        assert_eq!(width_percent(50, 100), 50);
        assert_eq!(width_percent(100, 100), 100);
        assert_eq!(width_percent(5, 0), 30);
    }

    #[test]
    fn test_disabled_indicator_ignores_updates() {
        let doc = parse_html("<html><body></body></html>").unwrap();
        let bar = ProgressBar::ensure(&doc, "#link-progress-bar", false).unwrap();
        bar.on_download_progress(50, Some(100));
        bar.set_done();
        // element exists but is never driven
        assert_eq!(bar.width_style(), None);
        assert_eq!(bar.status().as_deref(), Some(STATUS_WAITING));
    }

    #[test]
    fn test_status_transitions() {
        let doc = parse_html("<html><body></body></html>").unwrap();
        let bar = ProgressBar::ensure(&doc, "#link-progress-bar", true).unwrap();
        bar.set_done();
        assert_eq!(bar.status().as_deref(), Some(STATUS_DONE));
        bar.set_waiting();
        assert_eq!(bar.status().as_deref(), Some(STATUS_WAITING));
        bar.collapse();
        assert_eq!(bar.width_style().as_deref(), Some("width: 0%"));
    }
}
