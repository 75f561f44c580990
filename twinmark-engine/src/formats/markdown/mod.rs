//! Markdown format implementation
//!
//! This module implements bidirectional conversion between the content tree and Markdown text.
//! Both directions are line-oriented and hand-written: the dialect is small and has to stay
//! extensible through the [`HandlerRegistry`], which no off-the-shelf CommonMark crate allows.
//!
//! # Element Mapping Table
//!
//! | Tree Node        | Markdown                | Export Notes                        | Import Notes                          |
//! |------------------|-------------------------|-------------------------------------|---------------------------------------|
//! | Heading          | `#` … `######`          | Level clamped to 1-6                | Marker, whitespace, text              |
//! | Paragraph        | Text line               | Blocks inside are split out         | One paragraph per non-blank line      |
//! | List             | `- item` / `1. item`    | Nested lists indented by 2 spaces   | Greedy over consecutive items, flat   |
//! | Table            | Pipe table              | `table` handler                     | `table` handler                       |
//! | CodeBlock        | ```` ```lang ````       | Fence + blank line                  | `code` handler                        |
//! | MathBlock        | `$$…$$`                 | `math` handler                      | `math` handler                        |
//! | Diagram          | ```` ```plantuml ````   | `diagram` handler                   | `diagram` handler                     |
//! | Inline:          |                         |                                     |                                       |
//! |   Strong         | `**text**`              |                                     |                                       |
//! |   Emphasis       | `*text*` or `_text_`    | Uses `*`                            | Parses both                           |
//! |   Strike         | `~~text~~`              |                                     |                                       |
//! |   Link           | `[text](href)`          | Text only when href is empty        | Empty href stays literal              |
//! |   Image          | `![alt](src)`           | Nothing when src is empty           | Empty src stays literal               |
//! |   InlineCode     | `` `code` ``            | ``` `` ``` fence if code has a tick |                                       |
//! |   MathInline     | `$x$`                   | `math` handler                      | `math` handler                        |
//!
//! # Lossy Conversions
//!
//! - Consecutive paragraph lines are not joined; each line is its own paragraph
//! - Nested lists flatten on import (indentation is ignored)
//! - Line breaks inside paragraphs become paragraph breaks after re-import
//! - Text is never escaped, so literal `*` or `_` can turn into marks on re-import

pub mod inline;
pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::registry::HandlerRegistry;
use crate::tree::Document;

pub use parser::parse_markdown;
pub use serializer::{serialize_markdown, serialize_node};

/// Markdown format driven by a handler registry
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    handlers: HandlerRegistry,
}

impl MarkdownFormat {
    pub fn new(handlers: HandlerRegistry) -> Self {
        MarkdownFormat { handlers }
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Markdown with tables, fenced code, math and diagrams"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parse_markdown(source, &self.handlers))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize_markdown(doc, &self.handlers))
    }
}
