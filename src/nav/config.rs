// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Navigation controller configuration

use std::time::Duration;

/// Reserved attribute marking an element as library-owned
pub const LIBRARY_MARKER_ATTR: &str = "link-js-library";

/// Reserved attribute excluding an element from the merge
pub const IGNORE_MARKER_ATTR: &str = "link-ignore";

/// Navigation controller configuration.
///
/// Immutable after construction, except the replacement selector list which
/// stays appendable through [`NavController::add_link_id`].
///
/// [`NavController::add_link_id`]: crate::nav::NavController::add_link_id
#[derive(Debug, Clone)]
pub struct NavConfig {
    /// Drive the progress indicator during navigations
    pub show_progress_bar: bool,
    /// Selector locating the progress indicator element
    pub progress_bar_query: String,
    /// Defer body replacement until new stylesheets finish loading
    pub wait_for_css: bool,
    /// Selectors whose content is replaced on each navigation, in order
    pub link_ids: Vec<String>,
    /// Replace the whole head, or only update the title
    pub replace_head: bool,
    /// Leave anchors targeting a new browsing context alone
    pub ignore_target_blank: bool,
    /// Request timeout
    pub timeout: Duration,
    /// User agent for navigation and stylesheet fetches
    pub user_agent: Option<String>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            show_progress_bar: true,
            progress_bar_query: "#link-progress-bar".to_string(),
            wait_for_css: true,
            link_ids: Vec::new(),
            replace_head: true,
            ignore_target_blank: true,
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl NavConfig {
    /// Create a config with the documented defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the progress indicator
    pub fn show_progress_bar(mut self, show: bool) -> Self {
        self.show_progress_bar = show;
        self
    }

    /// Set the progress indicator selector
    pub fn progress_bar_query(mut self, query: impl Into<String>) -> Self {
        self.progress_bar_query = query.into();
        self
    }

    /// Gate body replacement on stylesheet loads
    pub fn wait_for_css(mut self, wait: bool) -> Self {
        self.wait_for_css = wait;
        self
    }

    /// Add a replacement selector
    pub fn link_id(mut self, selector: impl Into<String>) -> Self {
        self.link_ids.push(selector.into());
        self
    }

    /// Replace the full head on navigation
    pub fn replace_head(mut self, replace: bool) -> Self {
        self.replace_head = replace;
        self
    }

    /// Intercept clicks on `target="_blank"` anchors too
    pub fn ignore_target_blank(mut self, ignore: bool) -> Self {
        self.ignore_target_blank = ignore;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_defaults() {
        let config = NavConfig::default();
        assert!(config.show_progress_bar);
        assert_eq!(config.progress_bar_query, "#link-progress-bar");
        assert!(config.wait_for_css);
        assert!(config.link_ids.is_empty());
        assert!(config.replace_head);
    }

    #[test]
    fn test_builder_overrides() {
        let config = NavConfig::new()
            .wait_for_css(false)
            .replace_head(false)
            .link_id("#content")
            .link_id("#sidebar")
            .progress_bar_query("#bar");
        assert!(!config.wait_for_css);
        assert!(!config.replace_head);
        assert_eq!(config.link_ids, vec!["#content", "#sidebar"]);
        assert_eq!(config.progress_bar_query, "#bar");
    }
}
