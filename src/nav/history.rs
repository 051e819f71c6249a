// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Navigation history stack
//!
//! Entries are keyed by URL. Pushing after going back truncates the forward
//! tail, the way browser history behaves.

/// History stack with a cursor
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new entry, truncating any forward entries
    pub fn push(&mut self, url: impl Into<String>) {
        let insert_at = match self.cursor {
            Some(c) => c + 1,
            None => 0,
        };
        self.entries.truncate(insert_at);
        self.entries.push(url.into());
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Replace the current entry (or create the first one)
    pub fn replace(&mut self, url: impl Into<String>) {
        match self.cursor {
            Some(c) => self.entries[c] = url.into(),
            None => self.push(url),
        }
    }

    /// Current entry
    pub fn current(&self) -> Option<&str> {
        self.cursor.map(|c| self.entries[c].as_str())
    }

    /// Entry behind the cursor, without moving it
    pub fn peek_back(&self) -> Option<&str> {
        match self.cursor {
            Some(c) if c > 0 => Some(self.entries[c - 1].as_str()),
            _ => None,
        }
    }

    /// Entry ahead of the cursor, without moving it
    pub fn peek_forward(&self) -> Option<&str> {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => Some(self.entries[c + 1].as_str()),
            _ => None,
        }
    }

    /// Move the cursor back, returning the new current entry
    pub fn back(&mut self) -> Option<&str> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.current()
            }
            _ => None,
        }
    }

    /// Move the cursor forward, returning the new current entry
    pub fn forward(&mut self) -> Option<&str> {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                self.current()
            }
            _ => None,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_current() {
        let mut h = History::new();
        assert!(h.current().is_none());
        h.push("https://e.com/a");
        h.push("https://e.com/b");
        assert_eq!(h.current(), Some("https://e.com/b"));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_replace_keeps_length() {
        let mut h = History::new();
        h.push("https://e.com/a");
        h.replace("https://e.com/a2");
        assert_eq!(h.current(), Some("https://e.com/a2"));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_replace_on_empty_creates_entry() {
        let mut h = History::new();
        h.replace("https://e.com/a");
        assert_eq!(h.current(), Some("https://e.com/a"));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_back_and_forward() {
        let mut h = History::new();
        h.push("a");
        h.push("b");
        h.push("c");
        assert_eq!(h.back(), Some("b"));
        assert_eq!(h.back(), Some("a"));
        assert_eq!(h.back(), None);
        assert_eq!(h.forward(), Some("b"));
        assert_eq!(h.forward(), Some("c"));
        assert_eq!(h.forward(), None);
    }

    #[test]
    fn test_peek_does_not_move_cursor() {
        let mut h = History::new();
        h.push("a");
        h.push("b");
        assert_eq!(h.peek_back(), Some("a"));
        assert_eq!(h.current(), Some("b"));
        assert_eq!(h.peek_forward(), None);
        h.back();
        assert_eq!(h.peek_forward(), Some("b"));
        assert_eq!(h.current(), Some("a"));
    }

    #[test]
    fn test_push_truncates_forward_tail() {
        let mut h = History::new();
        h.push("a");
        h.push("b");
        h.back();
        h.push("c");
        assert_eq!(h.entries(), &["a".to_string(), "c".to_string()]);
        assert_eq!(h.current(), Some("c"));
    }
}
