//! Shared icon mapping for the outline format

/// Get the Unicode icon for a node kind (as returned by [`Node::kind_name`](crate::tree::Node::kind_name))
///
/// Returns a single Unicode character that visually represents the node kind. Custom node kinds
/// share the fallback icon.
pub fn get_icon(kind: &str) -> &'static str {
    match kind {
        "document" => "⧉",
        "heading" => "§",
        "paragraph" => "¶",
        "text" => "◦",
        "strong" => "𝐁",
        "emphasis" => "𝐼",
        "strike" => "∼",
        "link" => "⊕",
        "image" => "▣",
        "inline_code" => "ƒ",
        "line_break" => "↵",
        "list" => "☰",
        "list_item" => "•",
        "table" => "▦",
        "code_block" => "𝒱",
        "math_block" | "math_inline" => "√",
        "diagram" => "◇",
        _ => "○",
    }
}
