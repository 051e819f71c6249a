// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Headless DOM for fragment splicing
//!
//! A small arena-backed DOM built on html5ever, just enough surface for
//! selector queries, cross-document imports and child replacement.

mod document;
mod element;
mod node;
mod parser;
mod selector;

pub use document::Document;
pub use element::Element;
pub use node::{Node, NodeId, NodeType};
pub use parser::{parse_fragment, parse_html, parse_html_with_url};
pub use selector::Selector;
