//! Linear undo/redo over document snapshots.
//!
//! The log holds a baseline state plus one recorded state per user edit.
//! `undo_idx` counts how many recorded entries are currently applied: 0 means
//! the baseline is current, `entries.len()` means the newest entry is.
//! Mutations made inside a without-undo scope are applied by the caller but
//! never recorded here.

use tracing::debug;

/// Default number of entries kept before the oldest fold into the baseline.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// A recorded state and the edit that produced it.
#[derive(Debug, Clone)]
pub struct HistoryEntry<S> {
    pub description: String,
    pub state: S,
}

/// Snapshot log with a cursor.
#[derive(Debug, Clone)]
pub struct CommandHistory<S> {
    baseline: S,
    entries: Vec<HistoryEntry<S>>,
    undo_idx: usize,
    max_depth: usize,
    suppressed: usize,
    revision: u64,
}

impl<S: Clone> CommandHistory<S> {
    pub fn new(baseline: S) -> Self {
        Self::with_max_depth(baseline, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(baseline: S, max_depth: usize) -> Self {
        Self {
            baseline,
            entries: Vec::new(),
            undo_idx: 0,
            max_depth: max_depth.max(1),
            suppressed: 0,
            revision: 0,
        }
    }

    /// Reset to a single baseline (after new/open).
    pub fn clear(&mut self, baseline: S) {
        self.baseline = baseline;
        self.entries.clear();
        self.undo_idx = 0;
        self.revision += 1;
        debug!("History cleared");
    }

    /// Record the state produced by an edit.
    ///
    /// Discards any redo tail. Returns `false` without recording while a
    /// without-undo scope is open.
    pub fn record(&mut self, description: impl Into<String>, state: S) -> bool {
        if self.suppressed > 0 {
            return false;
        }
        self.entries.truncate(self.undo_idx);
        self.entries.push(HistoryEntry {
            description: description.into(),
            state,
        });
        if self.entries.len() > self.max_depth {
            let oldest = self.entries.remove(0);
            self.baseline = oldest.state;
        }
        self.undo_idx = self.entries.len();
        self.revision += 1;
        true
    }

    /// Step the cursor back and return the state that is now current.
    pub fn undo(&mut self) -> Option<&S> {
        if !self.can_undo() {
            return None;
        }
        self.undo_idx -= 1;
        self.revision += 1;
        Some(self.current())
    }

    /// Step the cursor forward and return the state that is now current.
    pub fn redo(&mut self) -> Option<&S> {
        if !self.can_redo() {
            return None;
        }
        self.undo_idx += 1;
        self.revision += 1;
        Some(self.current())
    }

    /// The state at the cursor.
    pub fn current(&self) -> &S {
        match self.undo_idx {
            0 => &self.baseline,
            n => &self.entries[n - 1].state,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo_idx > 0
    }

    pub fn can_redo(&self) -> bool {
        self.undo_idx < self.entries.len()
    }

    pub fn undo_idx(&self) -> usize {
        self.undo_idx
    }

    /// Bumped on every record, undo, redo, and clear. Unlike `undo_idx` it
    /// also changes when a record at full depth leaves the cursor in place.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_idx
            .checked_sub(1)
            .map(|i| self.entries[i].description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.undo_idx)
            .map(|e| e.description.as_str())
    }

    pub fn descriptions(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.description.as_str()).collect()
    }

    /// Open a without-undo scope. Scopes nest.
    pub fn suppress(&mut self) {
        self.suppressed += 1;
    }

    /// Close the innermost without-undo scope.
    pub fn resume(&mut self) {
        self.suppressed = self.suppressed.saturating_sub(1);
    }

    pub fn is_recording(&self) -> bool {
        self.suppressed == 0
    }
}
