//! Inline parsing (text run → inline nodes)
//!
//! The pipeline runs every handler's [`InlineTransformer`](crate::handler::InlineTransformer) in
//! priority order and then the built-in rules in a fixed order:
//!
//! | Order | Rule     | Syntax                  | Node                 |
//! |-------|----------|-------------------------|----------------------|
//! | 1     | strong   | `**text**`              | `Node::Strong`       |
//! | 2     | emphasis | `*text*`                | `Node::Emphasis`     |
//! | 3     | emphasis | `_text_`                | `Node::Emphasis`     |
//! | 4     | strike   | `~~text~~`              | `Node::Strike`       |
//! | 5     | image    | `![alt](src)`           | `Node::Image`        |
//! | 6     | link     | `[text](href)`          | `Node::Link`         |
//! | 7     | code     | `` `code` ``            | `Node::InlineCode`   |
//!
//! Code spans also accept a double-backtick fence (``` ``a`b`` ```), which is what the serializer
//! writes for code that contains a backtick.
//!
//! # Opaque spans
//!
//! Every stage works on a single string. A span that a stage turns into a node is cut out of the
//! string and replaced by one placeholder character from the Supplementary Private Use Area-A,
//! which indexes into a [`NodeStore`]. Later stages can see where the node sits (so `**$x$**`
//! wraps the math node in a strong node) but can never re-match the characters it was made
//! from. Container rules (strong, emphasis, strike, link) run the remaining rules over their inner
//! text before their children are resolved, so `**a [b](c)**` nests a link in the strong node.
//! Verbatim content (code, link targets, image sources and alt text) is read back through
//! [`NodeStore::source_text`], so `` `__init__` `` keeps its underscores.
//!
//! Characters of the user's text that already fall in the placeholder range are given slots of
//! their own before the first stage runs, so they always resolve back to themselves.

use crate::handler::ParseContext;
use crate::tree::{Image, Link, Node};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

const PLACEHOLDER_BASE: u32 = 0xF0000;
const PLACEHOLDER_LIMIT: usize = 0xFFFE;

static STRONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static EMPHASIS_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("valid regex"));
static EMPHASIS_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(.+?)_").expect("valid regex"));
static STRIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").expect("valid regex"));
static IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").expect("valid regex"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").expect("valid regex"));
static CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"``(.+?)``|`(.+?)`").expect("valid regex"));

/// Nodes cut out of an inline text run, addressed by placeholder characters.
///
/// Each slot also keeps the source text its node was made from, so rules that take their
/// content verbatim (code, link targets, image sources) can undo earlier replacements.
#[derive(Debug, Default)]
pub struct NodeStore {
    slots: Vec<Slot>,
}

#[derive(Debug)]
struct Slot {
    node: Option<Node>,
    source: String,
}

impl NodeStore {
    /// Store a node matched from `source` and return the placeholder that stands for it.
    ///
    /// Placeholders inside `source` are expanded before it is recorded. Returns `None` once the
    /// placeholder range is exhausted.
    pub fn embed(&mut self, node: Node, source: &str) -> Option<char> {
        let source = self.source_text(source);
        self.push(node, source)
    }

    /// Turn text containing placeholders into nodes, moving embedded nodes out of the store.
    ///
    /// Characters that do not address a live slot are kept as literal text. Embedded text nodes
    /// merge into the surrounding run.
    pub fn resolve(&mut self, text: &str) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut run = String::new();
        for ch in text.chars() {
            match self.take(ch) {
                Some(Node::Text(literal)) => run.push_str(&literal),
                Some(node) => {
                    if !run.is_empty() {
                        nodes.push(Node::Text(std::mem::take(&mut run)));
                    }
                    nodes.push(node);
                }
                None => run.push(ch),
            }
        }
        if !run.is_empty() {
            nodes.push(Node::Text(run));
        }
        nodes
    }

    /// The text as it was written, with every placeholder replaced by the source it stands for.
    pub fn source_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            match self.slot(ch) {
                Some(slot) => out.push_str(&slot.source),
                None => out.push(ch),
            }
        }
        out
    }

    /// Give characters that already fall in the placeholder range a slot of their own, so they
    /// come back as themselves instead of addressing another node.
    fn escape(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            if !is_placeholder_range(ch) {
                out.push(ch);
                continue;
            }
            let literal = ch.to_string();
            match self.push(Node::Text(literal.clone()), literal) {
                Some(placeholder) => out.push(placeholder),
                None => out.push(ch),
            }
        }
        out
    }

    fn push(&mut self, node: Node, source: String) -> Option<char> {
        if self.slots.len() >= PLACEHOLDER_LIMIT {
            return None;
        }
        let placeholder = char::from_u32(PLACEHOLDER_BASE + self.slots.len() as u32)?;
        self.slots.push(Slot {
            node: Some(node),
            source,
        });
        Some(placeholder)
    }

    fn slot(&self, ch: char) -> Option<&Slot> {
        let index = (ch as u32).checked_sub(PLACEHOLDER_BASE)? as usize;
        self.slots.get(index)
    }

    fn take(&mut self, ch: char) -> Option<Node> {
        let index = (ch as u32).checked_sub(PLACEHOLDER_BASE)? as usize;
        self.slots.get_mut(index)?.node.take()
    }
}

fn is_placeholder_range(ch: char) -> bool {
    (PLACEHOLDER_BASE..PLACEHOLDER_BASE + PLACEHOLDER_LIMIT as u32).contains(&(ch as u32))
}

/// The working buffer of the inline pipeline.
#[derive(Debug, Default)]
pub struct InlineText {
    text: String,
    store: NodeStore,
}

impl InlineText {
    pub fn new(text: &str) -> Self {
        InlineText {
            text: text.to_string(),
            store: NodeStore::default(),
        }
    }

    /// The current text, with transformed spans shown as placeholder characters.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Replace every match of `pattern` with the node built from it.
    ///
    /// When `build` returns `None` the match is left in place as text.
    pub fn replace_all<F>(&mut self, pattern: &Regex, build: F)
    where
        F: FnMut(&Captures<'_>, &mut NodeStore) -> Option<Node>,
    {
        self.text = replace_in(&self.text, pattern, &mut self.store, build);
    }

    /// Resolve the buffer into its final sequence of nodes.
    pub fn into_nodes(mut self) -> Vec<Node> {
        let text = std::mem::take(&mut self.text);
        self.store.resolve(&text)
    }
}

fn replace_in<F>(text: &str, pattern: &Regex, store: &mut NodeStore, mut build: F) -> String
where
    F: FnMut(&Captures<'_>, &mut NodeStore) -> Option<Node>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        match build(&caps, store).and_then(|node| store.embed(node, whole.as_str())) {
            Some(placeholder) => out.push(placeholder),
            None => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Parse a text run into inline nodes using the registry's handlers and the built-in rules.
pub fn parse_inline(text: &str, ctx: &ParseContext<'_>) -> Vec<Node> {
    let mut store = NodeStore::default();
    let text = store.escape(text);
    parse_inline_within(&text, ctx, &mut store)
}

/// Like [`parse_inline`], for text that may already hold placeholders from `store`.
pub fn parse_inline_within(text: &str, ctx: &ParseContext<'_>, store: &mut NodeStore) -> Vec<Node> {
    let mut buffer = InlineText {
        text: text.to_string(),
        store: std::mem::take(store),
    };
    for handler in ctx.registry().iter() {
        if let Some(transformer) = handler.inline_transformer() {
            transformer.parse_inline(&mut buffer, ctx);
            trace!(handler = handler.name(), text = buffer.as_str(), "inline handler applied");
        }
    }

    let InlineText { text, store: mut inner } = buffer;
    let text = apply_rules(&text, BUILTIN_RULES, &mut inner);
    let nodes = inner.resolve(&text);
    *store = inner;
    nodes
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Strong,
    EmphasisStar,
    EmphasisUnderscore,
    Strike,
    Image,
    Link,
    Code,
}

const BUILTIN_RULES: &[Rule] = &[
    Rule::Strong,
    Rule::EmphasisStar,
    Rule::EmphasisUnderscore,
    Rule::Strike,
    Rule::Image,
    Rule::Link,
    Rule::Code,
];

impl Rule {
    fn pattern(self) -> &'static Regex {
        match self {
            Rule::Strong => &STRONG,
            Rule::EmphasisStar => &EMPHASIS_STAR,
            Rule::EmphasisUnderscore => &EMPHASIS_UNDERSCORE,
            Rule::Strike => &STRIKE,
            Rule::Image => &IMAGE,
            Rule::Link => &LINK,
            Rule::Code => &CODE,
        }
    }

    /// Build the node for one match. `rest` are the rules that still have to run.
    fn build(self, caps: &Captures<'_>, rest: &[Rule], store: &mut NodeStore) -> Option<Node> {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        match self {
            Rule::Strong => Some(Node::Strong(nested(group(1), rest, store))),
            Rule::EmphasisStar | Rule::EmphasisUnderscore => {
                Some(Node::Emphasis(nested(group(1), rest, store)))
            }
            Rule::Strike => Some(Node::Strike(nested(group(1), rest, store))),
            Rule::Image => {
                // `![alt]()` stays literal so that it survives a round trip unchanged.
                if group(2).is_empty() {
                    return None;
                }
                Some(Node::Image(Image {
                    alt: store.source_text(group(1)),
                    src: store.source_text(group(2)),
                }))
            }
            Rule::Link => {
                if group(2).is_empty() {
                    return None;
                }
                Some(Node::Link(Link {
                    href: store.source_text(group(2)),
                    children: nested(group(1), rest, store),
                }))
            }
            Rule::Code => {
                let code = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                Some(Node::InlineCode(store.source_text(code)))
            }
        }
    }
}

fn apply_rules(text: &str, rules: &[Rule], store: &mut NodeStore) -> String {
    let Some((rule, rest)) = rules.split_first() else {
        return text.to_string();
    };
    let replaced = replace_in(text, rule.pattern(), store, |caps, store| {
        rule.build(caps, rest, store)
    });
    apply_rules(&replaced, rest, store)
}

fn nested(inner: &str, rest: &[Rule], store: &mut NodeStore) -> Vec<Node> {
    let transformed = apply_rules(inner, rest, store);
    store.resolve(&transformed)
}
