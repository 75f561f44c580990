//! Fenced code blocks
//!
//! An opening fence is three backticks followed by an optional word-character language tag.
//! Lines are kept verbatim until a line that trims to three backticks, or the end of input.

use crate::formats::markdown::serializer::render_code_block;
use crate::handler::{
    BlockInput, BlockParser, BlockResult, NodeSerializer, ParseContext, SerializeContext,
};
use crate::tree::Node;
use once_cell::sync::Lazy;
use regex::Regex;

static OPEN_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```([A-Za-z0-9_]*)\s*$").expect("valid regex"));

pub const NAME: &str = "code";
pub const PRIORITY: i32 = 45;

/// Display labels for the language tags the editor offers.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("python", "Python"),
    ("java", "Java"),
    ("kotlin", "Kotlin"),
    ("scala", "Scala"),
    ("swift", "Swift"),
    ("cpp", "C++"),
    ("c", "C"),
    ("csharp", "C#"),
    ("fsharp", "F#"),
    ("go", "Go"),
    ("rust", "Rust"),
    ("ruby", "Ruby"),
    ("php", "PHP"),
    ("perl", "Perl"),
    ("lua", "Lua"),
    ("r", "R"),
    ("matlab", "MATLAB"),
    ("sql", "SQL"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("less", "Less"),
    ("json", "JSON"),
    ("yaml", "YAML"),
    ("xml", "XML"),
    ("markdown", "Markdown"),
    ("bash", "Bash"),
    ("shell", "Shell"),
    ("powershell", "PowerShell"),
    ("dockerfile", "Dockerfile"),
    ("plaintext", "Plain text"),
];

/// Human-readable label for a language tag. Unknown tags are returned as-is, no tag gives `""`.
pub fn language_label(tag: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(value, _)| *value == tag)
        .map_or(tag, |(_, label)| label)
}

/// Collect the lines after an opening fence up to the closing fence.
///
/// Returns the fenced lines and the index just past the closing fence (or the end of input).
pub(crate) fn read_fenced<'a>(
    lines: &[&'a str],
    start: usize,
    close: &str,
) -> (Vec<&'a str>, usize) {
    let mut body = Vec::new();
    let mut index = start;
    while let Some(line) = lines.get(index) {
        index += 1;
        if line.trim() == close {
            break;
        }
        body.push(*line);
    }
    (body, index)
}

/// Parses and serializes fenced code blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeHandler;

impl BlockParser for CodeHandler {
    fn parse_block(&self, input: &BlockInput<'_>, _ctx: &ParseContext<'_>) -> Option<BlockResult> {
        let caps = OPEN_FENCE.captures(input.line)?;
        let (body, next_index) = read_fenced(input.lines, input.index + 1, "```");
        Some(BlockResult {
            node: Node::code_block(Some(&caps[1]), body.join("\n")),
            next_index,
        })
    }
}

impl NodeSerializer for CodeHandler {
    fn serialize(&self, node: &Node, _ctx: &SerializeContext<'_>) -> Option<String> {
        match node {
            Node::CodeBlock(block) => Some(render_code_block(block)),
            _ => None,
        }
    }
}
