//! Pipe tables
//!
//! ```text
//! | Name | Role |
//! | ---- | :--: |
//! | Ada  | dev  |
//! ```
//!
//! A table is a run of `|…|` lines whose second row consists only of `-`/`:` cells. The header
//! fixes the column count: body rows are padded with empty cells or truncated to it. Alignment
//! markers are not kept.

use crate::handler::{
    BlockInput, BlockParser, BlockResult, NodeSerializer, ParseContext, SerializeContext,
};
use crate::tree::{Node, Table};
use once_cell::sync::Lazy;
use regex::Regex;

static ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|(.+)\|$").expect("valid regex"));
static SEPARATOR_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-:]+$").expect("valid regex"));

pub const NAME: &str = "table";
pub const PRIORITY: i32 = 40;

/// Parses and serializes pipe tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableHandler;

impl BlockParser for TableHandler {
    fn parse_block(&self, input: &BlockInput<'_>, _ctx: &ParseContext<'_>) -> Option<BlockResult> {
        if !ROW.is_match(input.line) {
            return None;
        }

        let mut rows = Vec::new();
        let mut index = input.index;
        while let Some(cells) = input.lines.get(index).and_then(|line| parse_row(line)) {
            rows.push(cells);
            index += 1;
        }

        if rows.len() < 2 || !rows[1].iter().all(|cell| SEPARATOR_CELL.is_match(cell)) {
            return None;
        }

        let mut rows = rows.into_iter();
        let header = rows.next()?;
        let width = header.len();
        let body = rows
            .skip(1)
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Some(BlockResult {
            node: Node::Table(Table { header, rows: body }),
            next_index: index,
        })
    }
}

impl NodeSerializer for TableHandler {
    fn serialize(&self, node: &Node, _ctx: &SerializeContext<'_>) -> Option<String> {
        match node {
            Node::Table(table) => Some(serialize_pipe_table(table)),
            _ => None,
        }
    }
}

fn parse_row(line: &str) -> Option<Vec<String>> {
    let caps = ROW.captures(line.trim())?;
    Some(caps[1].split('|').map(|cell| cell.trim().to_string()).collect())
}

/// Render a table as pipe rows followed by a blank line. A table without rows renders as `""`.
pub fn serialize_pipe_table(table: &Table) -> String {
    let rows: Vec<&Vec<String>> = std::iter::once(&table.header)
        .filter(|header| !header.is_empty())
        .chain(table.rows.iter().filter(|row| !row.is_empty()))
        .collect();
    let Some(columns) = rows.iter().map(|row| row.len()).max() else {
        return String::new();
    };

    let mut output = String::new();
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = (0..columns)
            .map(|c| row.get(c).map(|cell| cell_text(cell)).unwrap_or_default())
            .collect();
        output.push_str(&format!("| {} |\n", cells.join(" | ")));
        if i == 0 {
            output.push_str(&format!("| {} |\n", vec!["---"; columns].join(" | ")));
        }
    }
    output.push('\n');
    output
}

fn cell_text(cell: &str) -> String {
    cell.trim().replace('\n', " ")
}
