//! Export tests for Markdown format (tree → Markdown)

use crate::common::{fixture, normalize, registry, registry_with_highlight, serialize};
use insta::assert_snapshot;
use twinmark_engine::formats::markdown::serialize_node;
use twinmark_engine::formats::TreevizFormat;
use twinmark_engine::tree::{CustomNode, ListItem};
use twinmark_engine::{to_markdown, to_tree, Document, Format, Node, SerializeContext};

#[test]
fn test_heading_and_paragraph() {
    let doc = Document::new(vec![
        Node::heading(1, vec![Node::text("Title")]),
        Node::paragraph(vec![
            Node::text("Hello "),
            Node::Strong(vec![Node::text("world")]),
        ]),
    ]);
    assert_eq!(serialize(&doc), "# Title\n\nHello **world**");
}

#[test]
fn test_code_block_node_keeps_trailing_blank_line() {
    let registry = registry();
    let ctx = SerializeContext::new(&registry);
    let node = Node::code_block(Some("lang"), "code");
    assert_eq!(serialize_node(&node, &ctx), "```lang\ncode\n```\n\n");
}

#[test]
fn test_blank_line_runs_in_code_collapse_on_export() {
    let doc = to_tree("```\na\n\n\nb\n```", &registry());
    assert_eq!(doc.children, vec![Node::code_block(None, "a\n\n\nb")]);
    assert_eq!(serialize(&doc), "```\na\n\nb\n```");
}

#[test]
fn test_marker_characters_survive_in_targets_and_code() {
    let source = "[docs](https://x.io/my_page_name) ![i](a_b_c.png) `__init__` ``a`b`` _a*b_";
    assert_eq!(normalize(source), source);
}

#[test]
fn test_opaque_blocks() {
    let doc = Document::new(vec![
        Node::Diagram("A -> B".into()),
        Node::MathBlock("e^{i\\pi}".into()),
        Node::paragraph(vec![Node::text("x = "), Node::MathInline("1".into())]),
    ]);
    assert_snapshot!(serialize(&doc), @r"
    ```plantuml
    A -> B
    ```

    $$e^{i\pi}$$

    x = $1$
    ");
}

#[test]
fn test_paragraph_with_embedded_blocks() {
    let doc = Document::new(vec![
        Node::paragraph(vec![
            Node::text("Look: "),
            Node::Diagram("A -> B".into()),
            Node::text(" then "),
            Node::Strong(vec![Node::text("this")]),
            Node::MathBlock("x".into()),
        ]),
        Node::heading(2, vec![Node::text("Next")]),
    ]);
    assert_snapshot!(serialize(&doc), @r"
    Look:

    ```plantuml
    A -> B
    ```

    then **this**

    $$x$$

    ## Next
    ");
}

#[test]
fn test_nested_lists() {
    let doc = Document::new(vec![Node::list(
        false,
        vec![
            ListItem::new(vec![Node::text("fruit")]),
            ListItem::new(vec![
                Node::text("veg"),
                Node::list(
                    true,
                    vec![
                        ListItem::new(vec![Node::text("kale")]),
                        ListItem::new(vec![Node::text("leek")]),
                    ],
                ),
            ]),
        ],
    )]);
    assert_snapshot!(serialize(&doc), @r"
    - fruit
    - veg
      1. kale
      2. leek
    ");
}

#[test]
fn test_custom_node_without_handler_renders_children() {
    let doc = Document::new(vec![Node::paragraph(vec![Node::Custom(CustomNode {
        kind: "highlight".into(),
        children: vec![Node::Emphasis(vec![Node::text("hi")])],
        ..CustomNode::default()
    })])]);

    assert_eq!(serialize(&doc), "*hi*");
    assert_eq!(to_markdown(&doc, &registry_with_highlight()), "==*hi*==");
}

#[test]
fn test_highlight_round_trip() {
    let registry = registry_with_highlight();
    let source = "a ==b $c$== d";
    let doc = to_tree(source, &registry);
    assert_eq!(to_markdown(&doc, &registry), source);
}

#[test]
fn test_kitchensink() {
    let md = normalize(&fixture("kitchensink.md"));
    assert_snapshot!(md, @r#"
    # Kitchen sink

    Intro with **bold**, *italic*, *also italic*, ~~gone~~ and `code`.

    A [link](https://example.com) and an image ![logo](logo.png).

    ## Lists

    - first
    - second with **mark**

    1. one
    2. two

    | Name | Role |
    | --- | --- |
    | Ada | engineer |
    | Linus |  |

    ```rust
    fn main() {
        println!("hi");
    }
    ```

    ```plantuml
    Alice -> Bob: hello
    ```

    $$\int_0^1 x\,dx$$

    Inline math $a^2 + b^2$ in text.
    "#);
}

#[test]
fn test_kitchensink_outline() {
    let doc = to_tree(&fixture("kitchensink.md"), &registry());
    let outline = TreevizFormat::default().serialize(&doc).unwrap();
    assert_snapshot!(outline.trim_end(), @r"
    ⧉ Document (11 blocks)
    ├─ § h1 Kitchen sink
    ├─ ¶ Intro with bold, italic, also…
    ├─ ¶ A link and an image logo.
    ├─ § h2 Lists
    ├─ ☰ 2 items (unordered)
    │ ├─ • first
    │ └─ • second with mark
    ├─ ☰ 2 items (ordered)
    │ ├─ • one
    │ └─ • two
    ├─ ▦ 2 columns, 2 rows
    ├─ 𝒱 Rust · fn main() {
    ├─ ◇ Alice -> Bob: hello
    ├─ √ \int_0^1 x\,dx
    └─ ¶ Inline math a^2 + b^2 in text.
    ");
}
