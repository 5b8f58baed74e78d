//! Undo/redo history over whole-document snapshots

use crate::model::{DocumentData, PositionContext, Range, Zone};

/// Everything needed to put a session back into an earlier state
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub document: DocumentData,
    pub zone: Zone,
    pub position_context: PositionContext,
    pub range: Range,
}

/// History collaborator of a session
pub trait HistoryProvider: std::fmt::Debug {
    /// Record a new state; clears the redo stack
    fn submit(&mut self, snapshot: DocumentSnapshot);

    /// Step back; returns the state to restore
    fn undo(&mut self) -> Option<DocumentSnapshot>;

    /// Step forward; returns the state to restore
    fn redo(&mut self) -> Option<DocumentSnapshot>;

    /// Drop the newest entry without making it redoable
    fn pop_undo(&mut self) -> Option<DocumentSnapshot>;

    /// Replace the newest entry with `snapshot`
    fn recovery(&mut self, snapshot: DocumentSnapshot);

    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;
}

/// Bounded snapshot stacks. The oldest undo entry is the baseline and is
/// never popped.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHistory {
    undo_stack: Vec<DocumentSnapshot>,
    redo_stack: Vec<DocumentSnapshot>,
    max_size: usize,
}

impl SnapshotHistory {
    /// Create a new history with default max size
    pub fn new() -> Self {
        Self::with_max_size(100)
    }

    /// Create a new history with specified max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl HistoryProvider for SnapshotHistory {
    fn submit(&mut self, snapshot: DocumentSnapshot) {
        self.redo_stack.clear();
        self.undo_stack.push(snapshot);

        // Trim if exceeded max size
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    fn undo(&mut self) -> Option<DocumentSnapshot> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        let top = self.undo_stack.pop()?;
        self.redo_stack.push(top);
        self.undo_stack.last().cloned()
    }

    fn redo(&mut self) -> Option<DocumentSnapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(snapshot.clone());
        Some(snapshot)
    }

    fn pop_undo(&mut self) -> Option<DocumentSnapshot> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        self.undo_stack.pop()
    }

    fn recovery(&mut self, snapshot: DocumentSnapshot) {
        match self.undo_stack.last_mut() {
            Some(top) => *top = snapshot,
            None => self.undo_stack.push(snapshot),
        }
    }

    fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
