//! PlantUML diagrams
//!
//! A ```` ```plantuml ```` fence (any case) holds the diagram source. The engine only carries the
//! source; [`DiagramHandler::image_url`] builds the address an external image resolver fetches.

use super::code::read_fenced;
use crate::handler::{
    BlockInput, BlockParser, BlockResult, NodeSerializer, ParseContext, SerializeContext,
};
use crate::tree::Node;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static OPEN_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```plantuml\s*$").expect("valid regex"));

pub const NAME: &str = "plantuml";
pub const PRIORITY: i32 = 44;

/// Source used when a fence is empty.
pub const EMPTY_DIAGRAM: &str = "@startuml\n@enduml";

pub const DEFAULT_SERVER_URL: &str = "https://www.plantuml.com/plantuml";

/// Image format requested from the diagram server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    #[default]
    Png,
    Svg,
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramFormat::Png => f.write_str("png"),
            DiagramFormat::Svg => f.write_str("svg"),
        }
    }
}

/// Where diagram images come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSettings {
    pub server_url: String,
    /// Used instead of `server_url` when set.
    pub proxy_url: Option<String>,
    pub format: DiagramFormat,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        DiagramSettings {
            server_url: DEFAULT_SERVER_URL.to_string(),
            proxy_url: None,
            format: DiagramFormat::default(),
        }
    }
}

impl DiagramSettings {
    /// The proxy when one is configured, the server otherwise.
    pub fn base_url(&self) -> &str {
        self.proxy_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.server_url)
    }
}

/// Parses and serializes PlantUML fences.
#[derive(Debug, Clone, Default)]
pub struct DiagramHandler {
    settings: DiagramSettings,
}

impl DiagramHandler {
    pub fn new(settings: DiagramSettings) -> Self {
        DiagramHandler { settings }
    }

    pub fn settings(&self) -> &DiagramSettings {
        &self.settings
    }

    /// `{base}/{format}/{encoding}` for a diagram source.
    pub fn image_url(&self, source: &str) -> String {
        format!(
            "{}/{}/{}",
            self.settings.base_url().trim_end_matches('/'),
            self.settings.format,
            encode_hex(source)
        )
    }
}

/// PlantUML `~h` encoding: the trimmed source as lowercase UTF-8 hex. Empty source encodes to `""`.
pub fn encode_hex(source: &str) -> String {
    let text = source.trim();
    if text.is_empty() {
        return String::new();
    }
    let mut encoded = String::with_capacity(2 + text.len() * 2);
    encoded.push_str("~h");
    encoded.extend(text.bytes().map(|byte| format!("{byte:02x}")));
    encoded
}

impl BlockParser for DiagramHandler {
    fn parse_block(&self, input: &BlockInput<'_>, _ctx: &ParseContext<'_>) -> Option<BlockResult> {
        if !OPEN_FENCE.is_match(input.line) {
            return None;
        }
        let (body, next_index) = read_fenced(input.lines, input.index + 1, "```");
        let source = body.join("\n");
        let source = match source.trim() {
            "" => EMPTY_DIAGRAM.to_string(),
            trimmed => trimmed.to_string(),
        };
        Some(BlockResult {
            node: Node::Diagram(source),
            next_index,
        })
    }
}

impl NodeSerializer for DiagramHandler {
    fn serialize(&self, node: &Node, _ctx: &SerializeContext<'_>) -> Option<String> {
        match node {
            Node::Diagram(source) => Some(format!("```plantuml\n{source}\n```\n\n")),
            _ => None,
        }
    }
}
