// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-navigation stylesheet gate and phase tracking
//!
//! Each `load_page` call owns its own gate: the counter can never leak
//! between navigations or controller instances. The gate opens once every
//! stylesheet it tracks has reported a load completion (success and failure
//! both count, mirroring onload/onerror).

/// Phases of a single navigation, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    /// Indicator reset, nothing fetched yet
    Waiting,
    /// GET in flight
    Fetching,
    /// New head content appended (or title updated)
    HeadMerged,
    /// Waiting on stylesheet load completions
    CssPending,
    /// Configured selectors spliced
    BodyMerged,
    /// Load event delivered
    Complete,
}

/// Counts stylesheet load completions for one navigation attempt
#[derive(Debug)]
pub struct StylesheetGate {
    total: usize,
    loaded: usize,
}

impl StylesheetGate {
    /// Create a gate over `total` pending stylesheets
    pub fn new(total: usize) -> Self {
        Self { total, loaded: 0 }
    }

    /// Record one load completion; returns true once the gate is open
    pub fn notify_loaded(&mut self) -> bool {
        self.loaded = (self.loaded + 1).min(self.total);
        self.is_open()
    }

    /// Whether body replacement may proceed
    pub fn is_open(&self) -> bool {
        self.loaded >= self.total
    }

    /// Number of stylesheets still pending
    pub fn pending(&self) -> usize {
        self.total - self.loaded
    }

    /// Number of stylesheets tracked
    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_stylesheets_opens_immediately() {
        let gate = StylesheetGate::new(0);
        assert!(gate.is_open());
        assert_eq!(gate.pending(), 0);
    }

    #[test]
    fn test_gate_stays_closed_until_all_loaded() {
        let mut gate = StylesheetGate::new(2);
        assert!(!gate.is_open());
        assert!(!gate.notify_loaded());
        assert!(!gate.is_open());
        assert!(gate.notify_loaded());
        assert!(gate.is_open());
    }

    #[test]
    fn test_extra_notifications_are_harmless() {
        let mut gate = StylesheetGate::new(1);
        assert!(gate.notify_loaded());
        assert!(gate.notify_loaded());
        assert_eq!(gate.pending(), 0);
    }
}
