// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Soft-navigation engine
//!
//! The controller fetches pages over HTTP, cuts out their head/body
//! fragments, and splices configured regions into the live document instead
//! of rebuilding it, keeping a progress indicator and a history stack in step.

pub mod config;
pub mod controller;
pub mod fragment;
pub mod gate;
pub mod history;
pub mod merge;
pub mod progress;

pub use config::{NavConfig, IGNORE_MARKER_ATTR, LIBRARY_MARKER_ATTR};
pub use controller::{LoadEvent, NavController};
pub use gate::{NavPhase, StylesheetGate};
pub use history::History;
pub use merge::OLD_HEAD_MARKER;
pub use progress::{ProgressBar, STATUS_DONE, STATUS_WAITING};
