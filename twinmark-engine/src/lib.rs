//! Markdown conversion and edit history for twinmark documents
//!
//!     This crate keeps two representations of a document in sync: a typed content tree (the
//!     editable form) and Markdown text (the stored form, and the unit of undo/redo history).
//!
//!     This is a pure lib: it powers the twinmark cli but is shell agnostic. No code here prints,
//!     reads env vars or touches the filesystem.
//!
//! Architecture
//!
//!     .
//!     ├── error.rs                # ConfigurationError, FormatError
//!     ├── tree                    # Content tree (owned children, no back references)
//!     ├── handler.rs              # Handler record + capability traits
//!     ├── registry.rs             # HandlerRegistry, ordered by priority
//!     ├── handlers                # Built-in handlers: table, plantuml, code, math
//!     ├── format.rs               # Format trait
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── parser.rs       # Markdown → tree
//!     │   │   ├── inline.rs       # Inline pipeline
//!     │   │   ├── serializer.rs   # tree → Markdown
//!     │   │   └── mod.rs
//!     │   ├── tree.rs             # tree as JSON
//!     │   └── treeviz.rs          # outline for inspection
//!     ├── history.rs              # Bounded undo/redo over Markdown snapshots
//!     └── session.rs              # Document + history, driven like an editor surface
//!
//! Handlers
//!
//!     Both conversion directions consult the handler registry before their built-in rules. A
//!     handler is a named record with a priority and up to three optional capabilities (block
//!     parsing, inline transformation, node serialization). Lower priorities run first; the first
//!     handler that claims a line or a node wins.
//!
//!     The inline pipeline replaces every span a stage turns into a node with a placeholder, so no
//!     later stage (handler or built-in rule) can re-match text inside it. See
//!     formats/markdown/inline.rs.
//!
//! Failure Policy
//!
//!     Registration is the only fallible engine operation. The parser never fails (malformed
//!     syntax degrades to paragraph text), the serializer never fails (unknown nodes render their
//!     children) and history reports no-ops through `done: false`.
//!
//! Testing
//!
//!     tests
//!     ├── lib.rs
//!     ├── common
//!     ├── history.rs
//!     └── markdown
//!         ├── import.rs
//!         ├── export.rs
//!         ├── table.rs
//!         └── roundtrip.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include
//!     these in the mod.

pub mod error;
pub mod format;
pub mod formats;
pub mod handler;
pub mod handlers;
pub mod history;
pub mod registry;
pub mod session;
pub mod tree;

pub use error::{ConfigurationError, FormatError};
pub use format::Format;
pub use formats::FormatRegistry;
pub use handler::{
    BlockInput, BlockParser, BlockResult, Handler, InlineText, InlineTransformer, NodeSerializer,
    ParseContext, SerializeContext, DEFAULT_PRIORITY,
};
pub use history::{HistoryManager, HistoryOutcome};
pub use registry::HandlerRegistry;
pub use session::EditorSession;
pub use tree::{Document, Node};

/// Parse Markdown into a content tree.
pub fn to_tree(markdown: &str, registry: &HandlerRegistry) -> Document {
    formats::markdown::parse_markdown(markdown, registry)
}

/// Serialize a content tree to normalized Markdown.
pub fn to_markdown(doc: &Document, registry: &HandlerRegistry) -> String {
    formats::markdown::serialize_markdown(doc, registry)
}
