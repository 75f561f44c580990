//! Core data structures for the content tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed node of the content tree.
///
/// Containers own their children; there are no parent or sibling pointers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Node {
    Text(String),
    Paragraph(Vec<Node>),
    Heading(Heading),
    Strong(Vec<Node>),
    Emphasis(Vec<Node>),
    Strike(Vec<Node>),
    Link(Link),
    Image(Image),
    InlineCode(String),
    LineBreak,
    List(List),
    ListItem(ListItem),
    Table(Table),
    CodeBlock(CodeBlock),
    MathBlock(String),
    MathInline(String),
    Diagram(String),
    Custom(CustomNode),
}

/// Represents the root of a document: an ordered forest of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<Node>,
}

/// Represents a heading with a specific level (1-6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub children: Vec<Node>,
}

/// Represents a hyperlink. An empty `href` renders the text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub children: Vec<Node>,
}

/// Represents an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// Represents a list of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

/// Represents an item in a list. Nested lists are `Node::List` children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub children: Vec<Node>,
}

/// Represents a pipe table. Cells carry their literal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Represents a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
}

/// A node kind contributed by a third-party handler.
///
/// Without a handler that serializes it, only its children are rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomNode {
    pub kind: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<Node>,
    /// Block-level custom nodes split a surrounding paragraph like the opaque blocks do.
    #[serde(default)]
    pub block: bool,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph(children)
    }

    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Node::Heading(Heading { level, children })
    }

    pub fn link(href: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Link(Link {
            href: href.into(),
            children,
        })
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Node::Image(Image {
            src: src.into(),
            alt: alt.into(),
        })
    }

    pub fn list(ordered: bool, items: Vec<ListItem>) -> Self {
        Node::List(List { ordered, items })
    }

    pub fn code_block(language: Option<&str>, code: impl Into<String>) -> Self {
        Node::CodeBlock(CodeBlock {
            language: language.filter(|l| !l.is_empty()).map(str::to_string),
            code: code.into(),
        })
    }

    /// Stable, lowercase name of the node kind (matches the serde tag).
    pub fn kind_name(&self) -> &str {
        match self {
            Node::Text(_) => "text",
            Node::Paragraph(_) => "paragraph",
            Node::Heading(_) => "heading",
            Node::Strong(_) => "strong",
            Node::Emphasis(_) => "emphasis",
            Node::Strike(_) => "strike",
            Node::Link(_) => "link",
            Node::Image(_) => "image",
            Node::InlineCode(_) => "inline_code",
            Node::LineBreak => "line_break",
            Node::List(_) => "list",
            Node::ListItem(_) => "list_item",
            Node::Table(_) => "table",
            Node::CodeBlock(_) => "code_block",
            Node::MathBlock(_) => "math_block",
            Node::MathInline(_) => "math_inline",
            Node::Diagram(_) => "diagram",
            Node::Custom(custom) => &custom.kind,
        }
    }

    /// Child nodes owned by this node. Leaves and lists (whose items are
    /// [`ListItem`]s) return an empty slice.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Paragraph(children)
            | Node::Strong(children)
            | Node::Emphasis(children)
            | Node::Strike(children) => children,
            Node::Heading(heading) => &heading.children,
            Node::Link(link) => &link.children,
            Node::ListItem(item) => &item.children,
            Node::Custom(custom) => &custom.children,
            _ => &[],
        }
    }

    /// Whether the node is an opaque block that cannot live inside a single paragraph line.
    pub fn is_block(&self) -> bool {
        match self {
            Node::Table(_) | Node::CodeBlock(_) | Node::MathBlock(_) | Node::Diagram(_) => true,
            Node::Custom(custom) => custom.block,
            _ => false,
        }
    }

    /// Text content with all markup stripped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) | Node::InlineCode(text) => out.push_str(text),
            Node::MathBlock(source) | Node::MathInline(source) | Node::Diagram(source) => {
                out.push_str(source)
            }
            Node::Image(image) => out.push_str(&image.alt),
            Node::CodeBlock(block) => out.push_str(&block.code),
            Node::LineBreak => out.push('\n'),
            Node::List(list) => {
                for item in &list.items {
                    for child in &item.children {
                        child.collect_text(out);
                    }
                }
            }
            Node::Table(table) => {
                let cells: Vec<&str> = table
                    .header
                    .iter()
                    .chain(table.rows.iter().flatten())
                    .map(String::as_str)
                    .collect();
                out.push_str(&cells.join(" "));
            }
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl ListItem {
    pub fn new(children: Vec<Node>) -> Self {
        ListItem { children }
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Document { children }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_strips_marks() {
        let node = Node::paragraph(vec![
            Node::text("Hello "),
            Node::Strong(vec![Node::text("big")]),
            Node::text(" "),
            Node::link("https://x.y", vec![Node::Emphasis(vec![Node::text("world")])]),
        ]);
        assert_eq!(node.plain_text(), "Hello big world");
    }

    #[test]
    fn opaque_kinds_are_blocks() {
        assert!(Node::MathBlock("x".into()).is_block());
        assert!(Node::Diagram("@startuml".into()).is_block());
        assert!(Node::code_block(Some("rust"), "fn main() {}").is_block());
        assert!(Node::Table(Table::default()).is_block());
        assert!(!Node::MathInline("x".into()).is_block());
        assert!(!Node::paragraph(vec![]).is_block());
    }

    #[test]
    fn empty_language_is_none() {
        assert_eq!(
            Node::code_block(Some(""), "x"),
            Node::CodeBlock(CodeBlock {
                language: None,
                code: "x".into()
            })
        );
    }

    #[test]
    fn custom_kind_name_is_its_kind() {
        let node = Node::Custom(CustomNode {
            kind: "callout".into(),
            ..Default::default()
        });
        assert_eq!(node.kind_name(), "callout");
    }
}
