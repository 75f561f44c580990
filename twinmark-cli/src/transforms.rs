//! CLI-specific transforms
//!
//! This module defines the transform combinations available to `twinmark inspect`.
//! Each transform is a stage + format combination (e.g., "tree-treeviz", "markdown-normalized").
//!
//! ## Stages
//!
//! 1. **Tree** - Markdown → content tree
//!    - `tree-treeviz`: Tree visualization with Unicode icons
//!    - `tree-json`: JSON representation
//!    - `tree-simple`: Top-level block kinds, one per line
//!
//! 2. **Markdown** - Markdown → content tree → Markdown
//!    - `markdown-normalized`: The text as the editor would store it
//!
//! ## Extra Parameters
//!
//! - `inline`: When set to "true", `tree-treeviz` also lists inline nodes (text runs, marks,
//!   links) under their block.
//!
//! Example: `twinmark inspect notes.md tree-treeviz --extra-inline`

use std::collections::HashMap;
use twinmark_engine::formats::treeviz::to_treeviz_str;
use twinmark_engine::formats::TreeFormat;
use twinmark_engine::{to_markdown, to_tree, Format, HandlerRegistry};

/// All available CLI transforms (stage + format combinations)
pub const AVAILABLE_TRANSFORMS: &[&str] = &[
    "tree-treeviz",
    "tree-json",
    "tree-simple",
    "markdown-normalized",
];

pub const DEFAULT_TRANSFORM: &str = "tree-treeviz";

/// Execute a named transform on Markdown source
///
/// # Examples
///
/// ```ignore
/// let registry = HandlerRegistry::with_defaults();
/// let output = execute_transform("# Title", "tree-json", &HashMap::new(), &registry)?;
/// ```
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    extra_params: &HashMap<String, String>,
    registry: &HandlerRegistry,
) -> Result<String, String> {
    if !AVAILABLE_TRANSFORMS.contains(&transform_name) {
        return Err(format!("Unknown transform: {transform_name}"));
    }

    let doc = to_tree(source, registry);
    match transform_name {
        "tree-treeviz" => {
            let show_inline = extra_params
                .get("inline")
                .is_some_and(|value| value == "true");
            Ok(to_treeviz_str(&doc, show_inline))
        }
        "tree-json" => TreeFormat
            .serialize(&doc)
            .map(|json| format!("{json}\n"))
            .map_err(|e| format!("JSON serialization failed: {e}")),
        "tree-simple" => Ok(doc
            .children
            .iter()
            .map(|node| format!("{}\n", node.kind_name()))
            .collect()),
        "markdown-normalized" => Ok(format!("{}\n", to_markdown(&doc, registry))),
        _ => Err(format!("Unknown transform: {transform_name}")),
    }
}
