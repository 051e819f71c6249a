// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # softnav
//!
//! Soft page navigation over a headless DOM: instead of reparsing a whole
//! document on every link activation, softnav fetches the target page,
//! extracts its head and body, and splices configured fragments into the
//! live document while driving a progress indicator and a history stack.
//!
//! ## Example
//!
//! ```no_run
//! use softnav::nav::{NavConfig, NavController};
//!
//! #[tokio::main]
//! async fn main() -> softnav::Result<()> {
//!     let config = NavConfig::new().link_id("#content");
//!     let ctrl = NavController::open("https://example.com/", config).await?;
//!     ctrl.click("a.next").await?;
//!     println!("{}", ctrl.title());
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod http;
pub mod nav;

pub use error::{Error, Result};
pub use nav::{LoadEvent, NavConfig, NavController};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
