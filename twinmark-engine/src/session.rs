//! Editor session
//!
//! Ties a live [`Document`] to a [`HistoryManager`] the way an editing surface drives them:
//! snapshots are taken from the serialized Markdown, and undo/redo restore a snapshot by parsing
//! it back into the tree. Restoring never records a replacement in history.

use crate::formats::markdown::{parse_markdown, serialize_markdown};
use crate::history::HistoryManager;
use crate::registry::HandlerRegistry;
use crate::tree::Document;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EditorSession {
    registry: HandlerRegistry,
    history: HistoryManager,
    document: Document,
}

impl EditorSession {
    pub fn new(registry: HandlerRegistry, history: HistoryManager) -> Self {
        EditorSession {
            registry,
            history,
            document: Document::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// The current document as Markdown
    pub fn markdown(&self) -> String {
        serialize_markdown(&self.document, &self.registry)
    }

    /// Replace the whole document, recording the replacement in history.
    pub fn set_markdown(&mut self, markdown: &str) {
        let previous = self.markdown();
        self.history.on_replace(&previous, markdown);
        self.load(markdown);
    }

    /// Snapshot the current document, skipping it if nothing changed since the last snapshot.
    pub fn record_snapshot(&mut self) {
        let snapshot = self.markdown();
        self.history.push(snapshot, true);
    }

    /// Mutate the tree, then snapshot the result.
    pub fn apply_edit<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Document),
    {
        edit(&mut self.document);
        self.record_snapshot();
    }

    /// Returns whether the document changed.
    pub fn undo(&mut self) -> bool {
        let current = self.markdown();
        let outcome = self.history.undo(&current);
        self.restore(outcome.done, outcome.target, "undo")
    }

    /// Returns whether the document changed.
    pub fn redo(&mut self) -> bool {
        let current = self.markdown();
        let outcome = self.history.redo(&current);
        self.restore(outcome.done, outcome.target, "redo")
    }

    pub fn reset_history(&mut self) {
        self.history.reset();
    }

    fn restore(&mut self, done: bool, target: Option<String>, action: &str) -> bool {
        match target {
            Some(target) if done && !target.is_empty() => {
                debug!(action, bytes = target.len(), "restoring snapshot");
                self.load(&target);
                true
            }
            _ => false,
        }
    }

    fn load(&mut self, markdown: &str) {
        self.document = parse_markdown(markdown, &self.registry);
    }
}
