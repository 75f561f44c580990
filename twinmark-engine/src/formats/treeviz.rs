//! Treeviz outline of the content tree
//!
//! One line per node, nested with box-drawing connectors:
//!
//! ```text
//! ⧉ Document (3 blocks)
//! ├─ § h1 Title
//! ├─ ¶ Hello world
//! └─ ☰ 2 items (unordered)
//!   ├─ • one
//!   └─ • two
//! ```
//!
//! Labels are plain text truncated to 30 characters. Inline nodes are only listed when asked for;
//! by default a paragraph shows its flattened text.

use super::icons::get_icon;
use crate::error::FormatError;
use crate::format::Format;
use crate::handlers::language_label;
use crate::tree::{Document, ListItem, Node};

const LABEL_WIDTH: usize = 30;

/// Outline format (serialization only)
#[derive(Debug, Clone, Copy, Default)]
pub struct TreevizFormat {
    /// List inline nodes (text runs, marks, links) as children of their block.
    pub show_inline: bool,
}

impl TreevizFormat {
    pub fn with_inline(show_inline: bool) -> Self {
        TreevizFormat { show_inline }
    }
}

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc, self.show_inline))
    }
}

pub fn to_treeviz_str(doc: &Document, show_inline: bool) -> String {
    let mut output = format!(
        "{} Document ({} blocks)\n",
        get_icon("document"),
        doc.children.len()
    );
    let entries: Vec<Entry<'_>> = doc.children.iter().map(Entry::Node).collect();
    write_entries(&mut output, &entries, "", show_inline);
    output
}

/// List items are not nodes in their own right, so the walker visits both.
enum Entry<'a> {
    Node(&'a Node),
    Item(&'a ListItem),
}

fn write_entries(output: &mut String, entries: &[Entry<'_>], prefix: &str, show_inline: bool) {
    for (i, entry) in entries.iter().enumerate() {
        let is_last = i + 1 == entries.len();
        let connector = if is_last { "└─" } else { "├─" };
        let (icon, label, children) = describe(entry, show_inline);
        output.push_str(&format!("{prefix}{connector} {icon} {}\n", truncate(&label)));

        let child_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
        write_entries(output, &children, &child_prefix, show_inline);
    }
}

fn describe<'a>(entry: &Entry<'a>, show_inline: bool) -> (&'static str, String, Vec<Entry<'a>>) {
    let node = match *entry {
        Entry::Item(item) => {
            let label = item.children.iter().map(Node::plain_text).collect();
            let children = if show_inline || item.children.iter().any(is_structural) {
                item.children
                    .iter()
                    .filter(|child| show_inline || is_structural(child))
                    .map(Entry::Node)
                    .collect()
            } else {
                Vec::new()
            };
            return (get_icon("list_item"), label, children);
        }
        Entry::Node(node) => node,
    };

    let label = match node {
        Node::Heading(heading) => format!("h{} {}", heading.level, node.plain_text()),
        Node::List(list) => format!(
            "{} items ({})",
            list.items.len(),
            if list.ordered { "ordered" } else { "unordered" }
        ),
        Node::Table(table) => format!(
            "{} columns, {} rows",
            table.header.len(),
            table.rows.len()
        ),
        Node::CodeBlock(block) => match block.language.as_deref() {
            Some(tag) => format!("{} · {}", language_label(tag), first_line(&block.code)),
            None => first_line(&block.code).to_string(),
        },
        Node::Link(link) => format!("{} → {}", node.plain_text(), link.href),
        Node::Image(image) => format!("{} ({})", image.alt, image.src),
        Node::Custom(custom) => format!("{} {}", custom.kind, node.plain_text()),
        Node::MathBlock(source) | Node::Diagram(source) => first_line(source).to_string(),
        _ => node.plain_text(),
    };

    let children = match node {
        Node::List(list) => list.items.iter().map(Entry::Item).collect(),
        _ if show_inline || node.children().iter().any(is_structural) => node
            .children()
            .iter()
            .filter(|child| show_inline || is_structural(child))
            .map(Entry::Node)
            .collect(),
        _ => Vec::new(),
    };

    (get_icon(node.kind_name()), label, children)
}

/// Nodes shown even when inline nodes are hidden.
fn is_structural(node: &Node) -> bool {
    node.is_block() || matches!(node, Node::List(_))
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

fn truncate(label: &str) -> String {
    let label = label.replace('\n', " ");
    if label.chars().count() > LABEL_WIDTH {
        let cut: String = label.chars().take(LABEL_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        label
    }
}
