//! Markdown parsing (Markdown → tree import)
//!
//! Single forward pass over the source lines. At every line the registered block parsers are
//! offered the line first; the built-in rules only run for lines nobody claimed.
//!
//! Built-in block rules, in precedence order:
//!
//!   1. Heading: `#`×1–6, whitespace, text
//!   2. Unordered list: `-` or `*`, whitespace, text (greedy over following items)
//!   3. Ordered list: digits, `.`, whitespace, text (greedy over following items)
//!   4. Blank line: skipped
//!   5. Paragraph: the trimmed line, inline-parsed
//!
//! Nested lists are never inferred from indentation: an indented `- item` continues the list it
//! follows.

use crate::handler::{BlockInput, BlockResult, ParseContext};
use crate::registry::HandlerRegistry;
use crate::tree::{Document, ListItem, Node};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("valid regex"));
static UNORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*]\s+(.+)$").expect("valid regex"));
static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s+(.+)$").expect("valid regex"));

/// Parse Markdown source into a document
///
/// Never fails: syntax that does not match a rule completely falls through to paragraph text, and
/// unclosed fences are consumed to the end of the input by the handlers that own them.
pub fn parse_markdown(source: &str, registry: &HandlerRegistry) -> Document {
    if source.trim().is_empty() {
        return Document::default();
    }

    let lines: Vec<&str> = source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let ctx = ParseContext::new(registry);

    let mut blocks = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        if let Some(result) = claim_block(&lines, index, &ctx) {
            blocks.push(result.node);
            index = result.next_index;
            continue;
        }

        let trimmed = lines[index].trim();
        if let Some(caps) = HEADING.captures(trimmed) {
            let level = caps[1].len() as u8;
            blocks.push(Node::heading(level, ctx.parse_inline(&caps[2])));
            index += 1;
        } else if UNORDERED_ITEM.is_match(trimmed) {
            let (list, next) = parse_list(&lines, index, false, &ctx);
            blocks.push(list);
            index = next;
        } else if ORDERED_ITEM.is_match(trimmed) {
            let (list, next) = parse_list(&lines, index, true, &ctx);
            blocks.push(list);
            index = next;
        } else if trimmed.is_empty() {
            index += 1;
        } else {
            blocks.push(Node::paragraph(ctx.parse_inline(trimmed)));
            index += 1;
        }
    }

    Document::new(blocks)
}

/// Offer the line at `index` to every block parser, in priority order.
fn claim_block(lines: &[&str], index: usize, ctx: &ParseContext<'_>) -> Option<BlockResult> {
    let raw = lines[index];
    let trimmed = raw.trim();
    let input = BlockInput {
        line: if trimmed.is_empty() { raw } else { trimmed },
        raw,
        lines,
        index,
    };

    for handler in ctx.registry().iter() {
        let Some(parser) = handler.block_parser() else {
            continue;
        };
        let Some(mut result) = parser.parse_block(&input, ctx) else {
            continue;
        };
        if result.next_index <= index {
            warn!(
                handler = handler.name(),
                index,
                next_index = result.next_index,
                "block parser did not advance; consuming one line"
            );
            result.next_index = index + 1;
        }
        result.next_index = result.next_index.min(lines.len());
        debug!(
            handler = handler.name(),
            kind = result.node.kind_name(),
            lines = result.next_index - index,
            "block claimed"
        );
        return Some(result);
    }
    None
}

/// Fold consecutive items of the same list kind into one list node.
fn parse_list(
    lines: &[&str],
    start: usize,
    ordered: bool,
    ctx: &ParseContext<'_>,
) -> (Node, usize) {
    let pattern: &Regex = if ordered {
        &ORDERED_ITEM
    } else {
        &UNORDERED_ITEM
    };

    let mut items = Vec::new();
    let mut index = start;
    while let Some(caps) = lines.get(index).and_then(|line| pattern.captures(line.trim())) {
        items.push(ListItem::new(ctx.parse_inline(&caps[1])));
        index += 1;
    }
    (Node::list(ordered, items), index)
}
