//! Handler definition
//!
//! A handler adds parse and/or serialize support for one custom block or inline syntax. Each
//! capability is a separate trait, and a [`Handler`] is a tagged record holding an optional
//! implementation of each. A missing capability is an explicit `None` slot, so the parser and
//! serializer never have to probe for methods.
//!
//! # Examples
//!
//! ```ignore
//! struct Callout;
//!
//! impl BlockParser for Callout {
//!     fn parse_block(&self, input: &BlockInput<'_>, ctx: &ParseContext<'_>) -> Option<BlockResult> {
//!         let body = input.line.strip_prefix("> ")?;
//!         Some(BlockResult::single(input, Node::paragraph(ctx.parse_inline(body))))
//!     }
//! }
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register(Handler::new("callout").with_priority(10).with_block_parser(Arc::new(Callout)))?;
//! ```

use crate::formats::markdown::{inline, serializer};
use crate::registry::HandlerRegistry;
use crate::tree::Node;
use std::fmt;
use std::sync::Arc;

pub use crate::formats::markdown::inline::{InlineText, NodeStore};

/// Priority assigned to handlers that do not declare one.
pub const DEFAULT_PRIORITY: i32 = 100;

/// The line a block parser is offered, plus the whole document for look-ahead.
#[derive(Debug, Clone, Copy)]
pub struct BlockInput<'a> {
    /// The current line with surrounding whitespace trimmed.
    pub line: &'a str,
    /// The current line exactly as it appears in the source.
    pub raw: &'a str,
    /// Every line of the source, without line terminators.
    pub lines: &'a [&'a str],
    /// Index of the current line in `lines`.
    pub index: usize,
}

/// A block claimed by a [`BlockParser`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlockResult {
    pub node: Node,
    /// Index of the first line not consumed. Must be greater than the input index.
    pub next_index: usize,
}

impl BlockResult {
    /// A block that consumed only the current line.
    pub fn single(input: &BlockInput<'_>, node: Node) -> Self {
        BlockResult {
            node,
            next_index: input.index + 1,
        }
    }
}

/// Recognizes a block-level syntax starting at the current line.
pub trait BlockParser: Send + Sync {
    /// Return `None` when the line is not handled by this parser.
    fn parse_block(&self, input: &BlockInput<'_>, ctx: &ParseContext<'_>) -> Option<BlockResult>;
}

/// Rewrites inline text before the built-in inline rules run.
///
/// Spans turned into nodes through [`InlineText::replace_all`] become opaque to every later stage.
pub trait InlineTransformer: Send + Sync {
    fn parse_inline(&self, text: &mut InlineText, ctx: &ParseContext<'_>);
}

/// Renders a node back to Markdown.
pub trait NodeSerializer: Send + Sync {
    /// `None` means "not mine". `Some(String::new())` is a deliberate empty rendering.
    fn serialize(&self, node: &Node, ctx: &SerializeContext<'_>) -> Option<String>;
}

/// A named, prioritized bundle of optional capabilities.
#[derive(Clone)]
pub struct Handler {
    name: String,
    priority: i32,
    block_parser: Option<Arc<dyn BlockParser>>,
    inline_transformer: Option<Arc<dyn InlineTransformer>>,
    serializer: Option<Arc<dyn NodeSerializer>>,
}

impl Handler {
    /// Create a handler with the default priority and no capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Handler {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            block_parser: None,
            inline_transformer: None,
            serializer: None,
        }
    }

    /// Lower priorities run first.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_block_parser(mut self, parser: Arc<dyn BlockParser>) -> Self {
        self.block_parser = Some(parser);
        self
    }

    pub fn with_inline_transformer(mut self, transformer: Arc<dyn InlineTransformer>) -> Self {
        self.inline_transformer = Some(transformer);
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn NodeSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn block_parser(&self) -> Option<&dyn BlockParser> {
        self.block_parser.as_deref()
    }

    pub fn inline_transformer(&self) -> Option<&dyn InlineTransformer> {
        self.inline_transformer.as_deref()
    }

    pub fn serializer(&self) -> Option<&dyn NodeSerializer> {
        self.serializer.as_deref()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("block_parser", &self.block_parser.is_some())
            .field("inline_transformer", &self.inline_transformer.is_some())
            .field("serializer", &self.serializer.is_some())
            .finish()
    }
}

/// Context handed to block parsers and inline transformers.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    registry: &'a HandlerRegistry,
}

impl<'a> ParseContext<'a> {
    pub fn new(registry: &'a HandlerRegistry) -> Self {
        ParseContext { registry }
    }

    pub fn registry(&self) -> &'a HandlerRegistry {
        self.registry
    }

    /// Run the full inline pipeline (handlers, then built-in rules) over `text`.
    pub fn parse_inline(&self, text: &str) -> Vec<Node> {
        inline::parse_inline(text, self)
    }

    /// Run the inline pipeline over text captured inside [`InlineText::replace_all`].
    ///
    /// Spans that earlier stages already replaced keep resolving against `store`.
    pub fn parse_inline_within(&self, text: &str, store: &mut NodeStore) -> Vec<Node> {
        inline::parse_inline_within(text, self, store)
    }
}

/// Context handed to node serializers.
#[derive(Debug, Clone, Copy)]
pub struct SerializeContext<'a> {
    registry: &'a HandlerRegistry,
}

impl<'a> SerializeContext<'a> {
    pub fn new(registry: &'a HandlerRegistry) -> Self {
        SerializeContext { registry }
    }

    pub fn registry(&self) -> &'a HandlerRegistry {
        self.registry
    }

    /// Serialize one node, offering it to the handlers first.
    pub fn serialize_node(&self, node: &Node) -> String {
        serializer::serialize_node(node, self)
    }

    /// Serialize and concatenate a list of nodes.
    pub fn serialize_children(&self, nodes: &[Node]) -> String {
        nodes.iter().map(|node| self.serialize_node(node)).collect()
    }
}
