//! Markdown serialization (tree → Markdown export)
//!
//! Recursive walk. Every node is first offered to the registered serializers in priority order;
//! the built-in rendering only applies when none of them claims it. The concatenated output is
//! normalized at the end: three or more newlines collapse to a blank line and the ends are trimmed.

use crate::handler::SerializeContext;
use crate::registry::HandlerRegistry;
use crate::tree::{CodeBlock, Document, List, Node};
use once_cell::sync::Lazy;
use regex::Regex;

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Serialize a document to normalized Markdown
pub fn serialize_markdown(doc: &Document, registry: &HandlerRegistry) -> String {
    let ctx = SerializeContext::new(registry);
    normalize(&ctx.serialize_children(&doc.children))
}

/// Serialize a single node without normalizing the result.
///
/// Block nodes end with a blank line (`"\n\n"`); inline nodes carry no separators.
pub fn serialize_node(node: &Node, ctx: &SerializeContext<'_>) -> String {
    for handler in ctx.registry().iter() {
        if let Some(rendered) = handler
            .serializer()
            .and_then(|serializer| serializer.serialize(node, ctx))
        {
            return rendered;
        }
    }
    render_builtin(node, ctx)
}

fn render_builtin(node: &Node, ctx: &SerializeContext<'_>) -> String {
    match node {
        Node::Text(text) => text.clone(),
        Node::Paragraph(children) if children.iter().any(Node::is_block) => {
            render_mixed_paragraph(children, ctx)
        }
        Node::Paragraph(children) => format!("{}\n\n", ctx.serialize_children(children)),
        Node::Heading(heading) => format!(
            "{} {}\n\n",
            "#".repeat(heading.level.clamp(1, 6) as usize),
            ctx.serialize_children(&heading.children)
        ),
        Node::Strong(children) => format!("**{}**", ctx.serialize_children(children)),
        Node::Emphasis(children) => {
            let inner = ctx.serialize_children(children);
            // A `*` in the text would close a `*` run early.
            let mark = if inner.contains('*') && !inner.contains('_') {
                '_'
            } else {
                '*'
            };
            format!("{mark}{inner}{mark}")
        }
        Node::Strike(children) => format!("~~{}~~", ctx.serialize_children(children)),
        Node::Link(link) => {
            let text = ctx.serialize_children(&link.children);
            if link.href.is_empty() {
                text
            } else {
                format!("[{text}]({})", link.href)
            }
        }
        Node::Image(image) if image.src.is_empty() => String::new(),
        Node::Image(image) => format!("![{}]({})", image.alt, image.src),
        Node::InlineCode(code) => {
            let fence = if code.contains('`') { "``" } else { "`" };
            format!("{fence}{code}{fence}")
        }
        Node::LineBreak => "\n".to_string(),
        Node::List(list) => format!("{}\n\n", render_list(list, ctx)),
        Node::ListItem(item) => ctx.serialize_children(&item.children),
        Node::CodeBlock(block) => render_code_block(block),
        // Opaque kinds without a claiming handler have no children to fall back to.
        Node::Table(_) | Node::MathBlock(_) | Node::MathInline(_) | Node::Diagram(_) => {
            String::new()
        }
        Node::Custom(custom) => ctx.serialize_children(&custom.children),
    }
}

/// A fenced code block followed by a blank line.
pub fn render_code_block(block: &CodeBlock) -> String {
    format!(
        "```{}\n{}\n```\n\n",
        block.language.as_deref().unwrap_or(""),
        block.code.replace('\r', "")
    )
}

/// A paragraph holding block children is emitted as separate chunks, in order.
fn render_mixed_paragraph(children: &[Node], ctx: &SerializeContext<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut inline = String::new();
    for child in children {
        if child.is_block() {
            flush_inline(&mut inline, &mut parts);
            let block = ctx.serialize_node(child);
            if !block.is_empty() {
                parts.push(block);
            }
        } else {
            inline.push_str(&ctx.serialize_node(child));
        }
    }
    flush_inline(&mut inline, &mut parts);

    // Trailing separator keeps the next sibling block off the last chunk's line.
    format!("{}\n\n", parts.join("\n\n"))
}

fn flush_inline(inline: &mut String, parts: &mut Vec<String>) {
    let trimmed = inline.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
    inline.clear();
}

fn render_list(list: &List, ctx: &SerializeContext<'_>) -> String {
    let mut lines = Vec::with_capacity(list.items.len());
    for (i, item) in list.items.iter().enumerate() {
        let marker = if list.ordered {
            format!("{}.", i + 1)
        } else {
            "-".to_string()
        };

        let (nested, content): (Vec<&Node>, Vec<&Node>) = item
            .children
            .iter()
            .partition(|child| matches!(child, Node::List(_)));
        let text: String = content.iter().map(|child| ctx.serialize_node(child)).collect();
        let mut line = format!("{marker} {}", text.trim());

        for sublist in nested {
            let rendered = ctx.serialize_node(sublist);
            for sub_line in rendered.trim().lines() {
                line.push_str("\n  ");
                line.push_str(sub_line);
            }
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn normalize(markdown: &str) -> String {
    EXCESS_NEWLINES
        .replace_all(markdown, "\n\n")
        .trim()
        .to_string()
}
