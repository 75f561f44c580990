//! Undo/redo history over Markdown snapshots
//!
//! Two stacks of plain strings. The undo stack is bounded: pushing past `max_size` evicts the
//! oldest snapshot. Snapshots are compared with exact string equality.

use std::collections::VecDeque;
use tracing::trace;

pub const DEFAULT_MAX_SIZE: usize = 50;

/// Result of an undo or redo request.
///
/// `target` is the snapshot to restore and is only present when `done` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOutcome {
    pub done: bool,
    pub target: Option<String>,
}

impl HistoryOutcome {
    fn noop() -> Self {
        HistoryOutcome {
            done: false,
            target: None,
        }
    }

    fn restore(target: String) -> Self {
        HistoryOutcome {
            done: true,
            target: Some(target),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo: VecDeque<String>,
    redo: Vec<String>,
    max_size: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl HistoryManager {
    /// A `max_size` of zero is treated as one.
    pub fn new(max_size: usize) -> Self {
        HistoryManager {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Record a snapshot and invalidate redo history.
    ///
    /// With `coalesce`, a snapshot equal to the current top is dropped.
    pub fn push(&mut self, state: impl Into<String>, coalesce: bool) {
        let state = state.into();
        if coalesce && self.top() == Some(state.as_str()) {
            return;
        }
        self.push_bounded(state);
        self.redo.clear();
    }

    /// Step back from `current`.
    pub fn undo(&mut self, current: &str) -> HistoryOutcome {
        // An edit made since the last snapshot must be undoable too.
        if self.top() != Some(current) {
            self.push_bounded(current.to_string());
            self.redo.clear();
        }

        if self.top() == Some(current) {
            self.undo.pop_back();
        }
        let Some(target) = self.top().map(str::to_string) else {
            return HistoryOutcome::noop();
        };

        self.redo.push(current.to_string());
        trace!(undo = self.undo.len(), redo = self.redo.len(), "undo");
        HistoryOutcome::restore(target)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: &str) -> HistoryOutcome {
        let Some(target) = self.redo.pop() else {
            return HistoryOutcome::noop();
        };
        self.push_bounded(current.to_string());
        trace!(undo = self.undo.len(), redo = self.redo.len(), "redo");
        HistoryOutcome::restore(target)
    }

    /// Record a wholesale content replacement (loading a document).
    ///
    /// A blank `old_state` is not worth undoing to and is skipped.
    pub fn on_replace(&mut self, old_state: &str, new_state: &str) {
        if !old_state.trim().is_empty() {
            self.push_bounded(old_state.to_string());
        }
        self.redo.clear();
        if self.top() != Some(new_state) {
            self.push_bounded(new_state.to_string());
        }
    }

    pub fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Undo stack, oldest first.
    pub fn undo_stack(&self) -> impl Iterator<Item = &str> {
        self.undo.iter().map(String::as_str)
    }

    /// Redo stack, oldest first (the next redo target is last).
    pub fn redo_stack(&self) -> impl Iterator<Item = &str> {
        self.redo.iter().map(String::as_str)
    }

    fn top(&self) -> Option<&str> {
        self.undo.back().map(String::as_str)
    }

    fn push_bounded(&mut self, state: String) {
        self.undo.push_back(state);
        while self.undo.len() > self.max_size {
            self.undo.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(history: &HistoryManager) -> Vec<&str> {
        history.undo_stack().collect()
    }

    #[test]
    fn test_push_without_coalesce_keeps_duplicates() {
        let mut history = HistoryManager::default();
        history.push("A", false);
        history.push("A", false);
        assert_eq!(stack(&history), vec!["A", "A"]);
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut history = HistoryManager::default();
        let outcome = history.undo("X");
        assert!(!outcome.done);
        assert_eq!(outcome.target, None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_captures_unrecorded_edit() {
        let mut history = HistoryManager::default();
        history.push("A", true);

        let outcome = history.undo("AB");
        assert_eq!(outcome.target.as_deref(), Some("A"));
        assert_eq!(stack(&history), vec!["A"]);
        assert_eq!(history.redo_stack().collect::<Vec<_>>(), vec!["AB"]);
    }

    #[test]
    fn test_redo_on_empty_stack_is_noop() {
        let mut history = HistoryManager::default();
        history.push("A", true);
        assert_eq!(history.redo("A"), HistoryOutcome::noop());
        assert_eq!(stack(&history), vec!["A"]);
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = HistoryManager::default();
        history.push("A", true);
        history.push("B", true);
        history.undo("B");
        assert!(history.can_redo());

        history.push("C", true);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_on_replace_skips_blank_old_state() {
        let mut history = HistoryManager::default();
        history.push("stale", true);
        history.undo("stale2");
        history.on_replace("  \n", "doc");
        assert_eq!(stack(&history), vec!["stale", "doc"]);
        assert!(!history.can_redo());

        history.on_replace("doc", "doc");
        assert_eq!(stack(&history), vec!["stale", "doc", "doc"]);
    }

    #[test]
    fn test_zero_max_size_keeps_one() {
        let mut history = HistoryManager::new(0);
        history.push("A", false);
        history.push("B", false);
        assert_eq!(history.max_size(), 1);
        assert_eq!(stack(&history), vec!["B"]);
    }

    #[test]
    fn test_reset() {
        let mut history = HistoryManager::default();
        history.push("A", true);
        history.push("B", true);
        history.undo("B");
        history.reset();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
