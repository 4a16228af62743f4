//! Snapshot history for undo/redo.
//!
//! Every committed mutation pushes the state it replaced. Undo swaps the
//! current state with the newest snapshot; redo walks forward again. Any new
//! mutation discards the redo branch.

use std::collections::VecDeque;

/// Undo/redo stacks of whole-state snapshots.
#[derive(Debug, Clone)]
pub struct History<S> {
    /// Oldest snapshot at the front, newest at the back
    undo: VecDeque<S>,
    /// Next state to redo at the front
    redo: VecDeque<S>,
    /// Maximum undo depth; None keeps every snapshot
    capacity: Option<usize>,
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<S> History<S> {
    /// Create an empty history, optionally capped at `capacity` undo steps.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            capacity,
        }
    }

    /// Record the state a mutation is about to replace.
    pub fn record(&mut self, previous: S) {
        self.undo.push_back(previous);
        self.redo.clear();
        self.enforce_capacity();
    }

    /// Step back. Returns the state to install, or hands `current` back
    /// when there is nothing to undo.
    pub fn undo(&mut self, current: S) -> Result<S, S> {
        let Some(previous) = self.undo.pop_back() else {
            return Err(current);
        };
        self.redo.push_front(current);
        Ok(previous)
    }

    /// Step forward. Returns the state to install, or hands `current` back
    /// when there is nothing to redo.
    pub fn redo(&mut self, current: S) -> Result<S, S> {
        let Some(next) = self.redo.pop_front() else {
            return Err(current);
        };
        self.undo.push_back(current);
        self.enforce_capacity();
        Ok(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Forget every snapshot.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn enforce_capacity(&mut self) {
        if let Some(capacity) = self.capacity {
            while self.undo.len() > capacity {
                self.undo.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        let mut history: History<u32> = History::default();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo(7), Err(7));
        assert_eq!(history.redo(7), Err(7));
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::default();
        // 0 -> 1 -> 2
        history.record(0);
        history.record(1);
        let current = 2;

        let current = history.undo(current).unwrap();
        assert_eq!(current, 1);
        let current = history.undo(current).unwrap();
        assert_eq!(current, 0);
        assert!(!history.can_undo());
        assert_eq!(history.redo_depth(), 2);

        let current = history.redo(current).unwrap();
        assert_eq!(current, 1);
        let current = history.redo(current).unwrap();
        assert_eq!(current, 2);
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut history = History::default();
        history.record(0);
        let current = history.undo(1).unwrap();
        assert!(history.can_redo());

        history.record(current);
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(Some(2));
        history.record(0);
        history.record(1);
        history.record(2);
        assert_eq!(history.undo_depth(), 2);

        let current = history.undo(3).unwrap();
        assert_eq!(current, 2);
        let current = history.undo(current).unwrap();
        assert_eq!(current, 1);
        assert_eq!(history.undo(current), Err(1));
    }
}
