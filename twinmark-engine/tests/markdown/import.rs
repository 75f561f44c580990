//! Import tests for Markdown format (Markdown → tree)

use crate::common::{parse, registry_with_highlight};
use std::sync::Arc;
use twinmark_engine::tree::{CustomNode, ListItem};
use twinmark_engine::{
    to_tree, BlockInput, BlockParser, BlockResult, Document, Handler, HandlerRegistry, Node,
    ParseContext,
};

#[test]
fn test_heading_and_paragraph() {
    let doc = parse("# Title\n\nHello **world**\n");
    assert_eq!(
        doc.children,
        vec![
            Node::heading(1, vec![Node::text("Title")]),
            Node::paragraph(vec![
                Node::text("Hello "),
                Node::Strong(vec![Node::text("world")]),
            ]),
        ]
    );
}

#[test]
fn test_code_fence_is_one_opaque_block() {
    let doc = parse("```lang\ncode\n```\n");
    assert_eq!(doc.children, vec![Node::code_block(Some("lang"), "code")]);
}

#[test]
fn test_code_fence_content_is_not_parsed() {
    let doc = parse("```\n# not a heading\n- not a list\n| a |\n```");
    assert_eq!(
        doc.children,
        vec![Node::code_block(None, "# not a heading\n- not a list\n| a |")]
    );
}

#[test]
fn test_unclosed_fence_consumes_rest() {
    let doc = parse("intro\n```sh\nls\n\n# still code");
    assert_eq!(
        doc.children,
        vec![
            Node::paragraph(vec![Node::text("intro")]),
            Node::code_block(Some("sh"), "ls\n\n# still code"),
        ]
    );
}

#[test]
fn test_plantuml_fence_beats_code_fence() {
    let doc = parse("```plantuml\nA -> B\n```");
    assert_eq!(doc.children, vec![Node::Diagram("A -> B".into())]);
}

#[test]
fn test_math_blocks_and_inline() {
    let doc = parse("$$x^2$$\n$$\na\nb\n$$\nsee $y$ here");
    assert_eq!(
        doc.children,
        vec![
            Node::MathBlock("x^2".into()),
            Node::MathBlock("a\nb".into()),
            Node::paragraph(vec![
                Node::text("see "),
                Node::MathInline("y".into()),
                Node::text(" here"),
            ]),
        ]
    );
}

#[test]
fn test_handler_spans_are_opaque_to_builtin_rules() {
    let doc = parse("$a*b*c$ and $x_1 + y_1$");
    assert_eq!(
        doc.children,
        vec![Node::paragraph(vec![
            Node::MathInline("a*b*c".into()),
            Node::text(" and "),
            Node::MathInline("x_1 + y_1".into()),
        ])]
    );
}

#[test]
fn test_marks_wrap_handler_spans() {
    let doc = parse("**$x$** and [$y$](u)");
    assert_eq!(
        doc.children,
        vec![Node::paragraph(vec![
            Node::Strong(vec![Node::MathInline("x".into())]),
            Node::text(" and "),
            Node::link("u", vec![Node::MathInline("y".into())]),
        ])]
    );
}

#[test]
fn test_third_party_inline_handler() {
    let registry = registry_with_highlight();
    let doc = to_tree("*==$k$ **hot**==*", &registry);

    let highlight = Node::Custom(CustomNode {
        kind: "highlight".into(),
        children: vec![
            Node::MathInline("k".into()),
            Node::text(" "),
            Node::Strong(vec![Node::text("hot")]),
        ],
        ..CustomNode::default()
    });
    assert_eq!(
        doc.children,
        vec![Node::paragraph(vec![Node::Emphasis(vec![highlight])])]
    );
}

#[test]
fn test_lists_are_flat_and_inline_parsed() {
    let doc = parse("- **a**\n  - b\n3. c");
    assert_eq!(
        doc.children,
        vec![
            Node::list(
                false,
                vec![
                    ListItem::new(vec![Node::Strong(vec![Node::text("a")])]),
                    ListItem::new(vec![Node::text("b")]),
                ]
            ),
            Node::list(true, vec![ListItem::new(vec![Node::text("c")])]),
        ]
    );
}

#[test]
fn test_malformed_syntax_degrades_to_text() {
    let doc = parse("**open\n[text](\n| lonely |\n####### deep");
    let texts: Vec<String> = doc.children.iter().map(Node::plain_text).collect();
    assert_eq!(texts, vec!["**open", "[text](", "| lonely |", "####### deep"]);
    assert!(doc
        .children
        .iter()
        .all(|node| matches!(node, Node::Paragraph(_))));
}

#[test]
fn test_empty_input() {
    assert_eq!(parse(""), Document::default());
    assert_eq!(parse("\n\n   \n"), Document::default());
}

#[test]
fn test_verbatim_inline_content_keeps_handler_syntax() {
    let doc = parse("Run `echo $A $B` from [env](https://a.io/$v$/my_env)");
    assert_eq!(
        doc.children,
        vec![Node::paragraph(vec![
            Node::text("Run "),
            Node::InlineCode("echo $A $B".into()),
            Node::text(" from "),
            Node::link("https://a.io/$v$/my_env", vec![Node::text("env")]),
        ])]
    );
}

/// Claims `:::` fences, ahead of every built-in handler.
struct Admonition;

impl BlockParser for Admonition {
    fn parse_block(&self, input: &BlockInput<'_>, _ctx: &ParseContext<'_>) -> Option<BlockResult> {
        let kind = input.line.strip_prefix(":::")?.trim();
        if kind.is_empty() {
            return None;
        }
        let mut children = Vec::new();
        let mut index = input.index + 1;
        while let Some(line) = input.lines.get(index) {
            index += 1;
            if line.trim() == ":::" {
                break;
            }
            children.push(Node::text(line.trim()));
        }
        Some(BlockResult {
            node: Node::Custom(CustomNode {
                kind: kind.to_string(),
                children,
                block: true,
                ..CustomNode::default()
            }),
            next_index: index,
        })
    }
}

#[test]
fn test_third_party_block_handler() {
    let mut registry = HandlerRegistry::with_defaults();
    registry
        .register(
            Handler::new("admonition")
                .with_priority(10)
                .with_block_parser(Arc::new(Admonition)),
        )
        .unwrap();

    let doc = to_tree(":::note\n$$x$$\n:::\nafter", &registry);
    assert_eq!(doc.children.len(), 2);
    match &doc.children[0] {
        Node::Custom(custom) => {
            assert_eq!(custom.kind, "note");
            // The admonition owns the line, so the math block handler never saw it.
            assert_eq!(custom.children, vec![Node::text("$$x$$")]);
        }
        other => panic!("Expected custom node, got {other:?}"),
    }
}
