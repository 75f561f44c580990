//! Shared helpers for the engine integration tests.

#![allow(dead_code)]

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;
use twinmark_engine::tree::CustomNode;
use twinmark_engine::{
    to_markdown, to_tree, Document, Handler, HandlerRegistry, InlineText, InlineTransformer,
    Node, NodeSerializer, ParseContext, SerializeContext,
};

/// Registry with the four built-in handlers.
pub fn registry() -> HandlerRegistry {
    HandlerRegistry::with_defaults()
}

pub fn parse(md: &str) -> Document {
    to_tree(md, &registry())
}

pub fn serialize(doc: &Document) -> String {
    to_markdown(doc, &registry())
}

/// Markdown → tree → Markdown with the default handlers.
pub fn normalize(md: &str) -> String {
    serialize(&parse(md))
}

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

static HIGHLIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"==(.+?)==").unwrap());

/// `==text==` highlight marks, as a third-party handler would add them.
pub struct Highlight;

impl InlineTransformer for Highlight {
    fn parse_inline(&self, text: &mut InlineText, ctx: &ParseContext<'_>) {
        text.replace_all(&HIGHLIGHT, |caps, store| {
            Some(Node::Custom(CustomNode {
                kind: "highlight".into(),
                children: ctx.parse_inline_within(&caps[1], store),
                ..CustomNode::default()
            }))
        });
    }
}

impl NodeSerializer for Highlight {
    fn serialize(&self, node: &Node, ctx: &SerializeContext<'_>) -> Option<String> {
        match node {
            Node::Custom(custom) if custom.kind == "highlight" => {
                Some(format!("=={}==", ctx.serialize_children(&custom.children)))
            }
            _ => None,
        }
    }
}

pub fn registry_with_highlight() -> HandlerRegistry {
    let mut registry = registry();
    let highlight = Arc::new(Highlight);
    registry
        .register(
            Handler::new("highlight")
                .with_inline_transformer(highlight.clone())
                .with_serializer(highlight),
        )
        .expect("unique name");
    registry
}
