//! LaTeX math
//!
//! - Block: `$$x$$` on one line, or `$$` fences around several lines
//! - Inline: `$x$` with no `$` or newline inside
//!
//! Sources are trimmed and carried verbatim; rendering belongs to an external math backend.

use super::code::read_fenced;
use crate::handler::{
    BlockInput, BlockParser, BlockResult, InlineText, InlineTransformer, NodeSerializer,
    ParseContext, SerializeContext,
};
use crate::tree::Node;
use once_cell::sync::Lazy;
use regex::Regex;

static SINGLE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\$\$(.+)\$\$\s*$").expect("valid regex"));
static OPEN_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\$\$\s*$").expect("valid regex"));
static INLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([^$\n]+)\$").expect("valid regex"));

pub const NAME: &str = "math";
pub const PRIORITY: i32 = 50;

/// Parses and serializes block and inline formulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathHandler;

impl BlockParser for MathHandler {
    fn parse_block(&self, input: &BlockInput<'_>, _ctx: &ParseContext<'_>) -> Option<BlockResult> {
        if let Some(caps) = SINGLE_LINE.captures(input.line) {
            return Some(BlockResult::single(
                input,
                Node::MathBlock(caps[1].trim().to_string()),
            ));
        }
        if OPEN_FENCE.is_match(input.line) {
            let (body, next_index) = read_fenced(input.lines, input.index + 1, "$$");
            return Some(BlockResult {
                node: Node::MathBlock(body.join("\n").trim().to_string()),
                next_index,
            });
        }
        None
    }
}

impl InlineTransformer for MathHandler {
    fn parse_inline(&self, text: &mut InlineText, _ctx: &ParseContext<'_>) {
        text.replace_all(&INLINE, |caps, _| {
            let source = caps[1].trim();
            (!source.is_empty()).then(|| Node::MathInline(source.to_string()))
        });
    }
}

impl NodeSerializer for MathHandler {
    fn serialize(&self, node: &Node, _ctx: &SerializeContext<'_>) -> Option<String> {
        match node {
            // Sources that cannot sit between `$$` on one line use the fenced form.
            Node::MathBlock(source) if source.is_empty() || source.contains('\n') => {
                Some(format!("$$\n{source}\n$$\n\n"))
            }
            Node::MathBlock(source) => Some(format!("$${source}$$\n\n")),
            Node::MathInline(source) => Some(format!("${source}$")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HandlerRegistry;

    fn parse(lines: &[&str]) -> Option<BlockResult> {
        let registry = HandlerRegistry::new();
        let input = BlockInput {
            line: lines[0].trim(),
            raw: lines[0],
            lines,
            index: 0,
        };
        MathHandler.parse_block(&input, &ParseContext::new(&registry))
    }

    fn serialize(node: &Node) -> Option<String> {
        let registry = HandlerRegistry::new();
        MathHandler.serialize(node, &SerializeContext::new(&registry))
    }

    #[test]
    fn test_single_line_block() {
        let result = parse(&["$$ e = mc^2 $$"]).unwrap();
        assert_eq!(result.node, Node::MathBlock("e = mc^2".into()));
        assert_eq!(result.next_index, 1);
    }

    #[test]
    fn test_fenced_block() {
        let result = parse(&["$$", "  a + b", "= c  ", "$$", "x"]).unwrap();
        assert_eq!(result.node, Node::MathBlock("a + b\n= c".into()));
        assert_eq!(result.next_index, 4);
    }

    #[test]
    fn test_unclosed_fenced_block() {
        let result = parse(&["$$", "x"]).unwrap();
        assert_eq!(result.node, Node::MathBlock("x".into()));
        assert_eq!(result.next_index, 2);
    }

    #[test]
    fn test_not_math() {
        assert!(parse(&["costs $5"]).is_none());
    }

    #[test]
    fn test_inline_formulas() {
        let registry = HandlerRegistry::new();
        let mut text = InlineText::new("area $ \\pi r^2 $ and $ $ dollars");
        MathHandler.parse_inline(&mut text, &ParseContext::new(&registry));
        assert_eq!(
            text.into_nodes(),
            vec![
                Node::text("area "),
                Node::MathInline("\\pi r^2".into()),
                Node::text(" and $ $ dollars"),
            ]
        );
    }

    #[test]
    fn test_serialize_forms() {
        assert_eq!(serialize(&Node::MathBlock("x".into())).unwrap(), "$$x$$\n\n");
        assert_eq!(
            serialize(&Node::MathBlock("a\nb".into())).unwrap(),
            "$$\na\nb\n$$\n\n"
        );
        assert_eq!(serialize(&Node::MathBlock(String::new())).unwrap(), "$$\n\n$$\n\n");
        assert_eq!(serialize(&Node::MathInline("y".into())).unwrap(), "$y$");
        assert!(serialize(&Node::text("$")).is_none());
    }
}
