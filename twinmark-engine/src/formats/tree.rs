//! Tree JSON format
//!
//! The content tree exchanged as pretty-printed JSON. Every node is an object with a `kind` tag and
//! its payload under `data`:
//!
//! ```text
//! {
//!   "children": [
//!     { "kind": "heading", "data": { "level": 1, "children": [ { "kind": "text", "data": "Title" } ] } }
//!   ]
//! }
//! ```

use crate::error::FormatError;
use crate::format::Format;
use crate::tree::Document;

/// Lossless JSON form of the content tree
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFormat;

impl Format for TreeFormat {
    fn name(&self) -> &str {
        "tree"
    }

    fn description(&self) -> &str {
        "Content tree as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        serde_json::from_str(source).map_err(|e| FormatError::ParseError(e.to_string()))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serde_json::to_string_pretty(doc)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}
