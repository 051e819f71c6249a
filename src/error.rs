// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for softnav
//!
//! Navigation failures are typed: transport errors, non-2xx responses and
//! missing document fragments are distinct kinds, never folded into a
//! success path.

use thiserror::Error;

/// Result type alias for softnav operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for softnav
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Navigation reached the server but did not succeed
    #[error("Navigation failed to {url}: {reason}")]
    NavigationFailed {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// The fetched document is missing a required fragment
    #[error("Fetched document has no <{fragment}> block: {url}")]
    MissingFragment { fragment: &'static str, url: String },

    /// HTML parsing failed
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// DOM operation failed
    #[error("DOM error: {0}")]
    Dom(String),

    /// Selector parsing error
    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new DOM error
    pub fn dom<S: Into<String>>(msg: S) -> Self {
        Error::Dom(msg.into())
    }

    /// Create a navigation error with status context
    pub fn navigation_failed(
        url: impl Into<String>,
        status: Option<u16>,
        reason: impl Into<String>,
    ) -> Self {
        Error::NavigationFailed {
            url: url.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a missing-fragment error
    pub fn missing_fragment(fragment: &'static str, url: impl Into<String>) -> Self {
        Error::MissingFragment {
            fragment,
            url: url.into(),
        }
    }

    /// Create a selector error
    pub fn selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Selector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a transport-level error
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::NavigationFailed { status: Some(s), .. } if (400..500).contains(s))
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::NavigationFailed { status: Some(s), .. } if (500..600).contains(s))
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::NavigationFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::NavigationFailed { url, .. } => Some(url),
            Error::MissingFragment { url, .. } => Some(url),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
