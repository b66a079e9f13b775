//! Snapshot-based undo/redo history.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `UndoHistory` - bounded sequence of markup snapshots with a cursor

use smol_str::SmolStr;

/// Trait for managing snapshot undo/redo.
///
/// None of these operations can fail: out-of-range requests return `None`
/// or do nothing.
pub trait UndoManager {
    /// Record a new snapshot as the current state.
    fn push(&mut self, snapshot: &str);

    /// Step back one entry, returning the snapshot now current.
    fn undo(&mut self) -> Option<SmolStr>;

    /// Step forward one entry, returning the snapshot now current.
    fn redo(&mut self) -> Option<SmolStr>;

    /// Replace all history with a single baseline snapshot.
    fn reset(&mut self, snapshot: &str);

    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;
}

/// Bounded history of markup snapshots.
///
/// `cursor` always indexes into `entries`, or is `None` when empty. The
/// entry at the cursor is the state currently shown in the editor.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: Vec<SmolStr>,
    cursor: Option<usize>,
    max_entries: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl UndoHistory {
    /// Create an empty history holding at most `max_entries` snapshots.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            max_entries: max_entries.max(1),
        }
    }

    /// Create a history seeded with one baseline snapshot.
    pub fn with_baseline(snapshot: &str, max_entries: usize) -> Self {
        let mut history = Self::new(max_entries);
        history.reset(snapshot);
        history
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> Option<&str> {
        self.cursor.map(|i| self.entries[i].as_str())
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// All snapshots, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(SmolStr::as_str)
    }
}

impl UndoManager for UndoHistory {
    fn push(&mut self, snapshot: &str) {
        if self.current() == Some(snapshot) {
            return;
        }

        // Drop the redo branch.
        let keep = self.cursor.map_or(0, |i| i + 1);
        self.entries.truncate(keep);

        self.entries.push(SmolStr::new(snapshot));
        let mut cursor = self.entries.len() - 1;

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
            cursor -= 1;
        }
        self.cursor = Some(cursor);
    }

    fn undo(&mut self) -> Option<SmolStr> {
        let cursor = self.cursor.filter(|&i| i > 0)? - 1;
        self.cursor = Some(cursor);
        Some(self.entries[cursor].clone())
    }

    fn redo(&mut self) -> Option<SmolStr> {
        let cursor = self.cursor.filter(|&i| i + 1 < self.entries.len())? + 1;
        self.cursor = Some(cursor);
        Some(self.entries[cursor].clone())
    }

    fn reset(&mut self, snapshot: &str) {
        self.entries.clear();
        self.entries.push(SmolStr::new(snapshot));
        self.cursor = Some(0);
    }

    fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|i| i > 0)
    }

    fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|i| i + 1 < self.entries.len())
    }
}
