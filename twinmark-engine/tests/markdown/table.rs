use crate::common::{normalize, parse, serialize};
use twinmark_engine::tree::Table;
use twinmark_engine::{Document, Node};

#[test]
fn test_table_round_trip() {
    let md = "| Header 1 | Header 2 |\n| :--- | :---: |\n| Cell 1 | Cell 2 |\n| Cell 3 | Cell 4 |";
    let doc = parse(md);

    let Node::Table(table) = &doc.children[0] else {
        panic!("expected a table, got {:?}", doc.children[0]);
    };
    assert_eq!(table.header, vec!["Header 1", "Header 2"]);
    assert_eq!(table.rows.len(), 2);

    // Alignment markers are dropped.
    assert_eq!(
        serialize(&doc),
        "| Header 1 | Header 2 |\n| --- | --- |\n| Cell 1 | Cell 2 |\n| Cell 3 | Cell 4 |"
    );
}

#[test]
fn test_short_rows_are_padded() {
    let md = "| a | b | c |\n|---|---|---|\n| 1 |\n| 1 | 2 | 3 | 4 |";
    let Node::Table(table) = &parse(md).children[0] else {
        panic!("expected a table");
    };
    assert_eq!(table.rows[0], vec!["1", "", ""]);
    assert_eq!(table.rows[1], vec!["1", "2", "3"]);
}

#[test]
fn test_ragged_tree_is_padded_on_export() {
    let doc = Document::new(vec![Node::Table(Table {
        header: vec!["x".into()],
        rows: vec![vec!["1".into(), "2".into()]],
    })]);
    assert_eq!(serialize(&doc), "| x |  |\n| --- | --- |\n| 1 | 2 |");
}

#[test]
fn test_missing_separator_is_not_a_table() {
    let md = "| a | b |\n| c | d |";
    let doc = parse(md);
    assert!(doc.children.iter().all(|node| matches!(node, Node::Paragraph(_))));
    assert_eq!(normalize(md), "| a | b |\n\n| c | d |");
}

#[test]
fn test_table_ends_at_first_non_row() {
    let md = "| a |\n| - |\n| 1 |\ntrailing text";
    let doc = parse(md);
    assert_eq!(doc.children.len(), 2);
    assert!(matches!(doc.children[0], Node::Table(_)));
    assert_eq!(doc.children[1].plain_text(), "trailing text");
}
