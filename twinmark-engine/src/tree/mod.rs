//! Content tree for twinmark documents.
//!
//! The tree is an owned, acyclic forest: every container holds its children in a `Vec` and
//! nothing points back up. Navigation that an editor surface needs (previous and next sibling)
//! is computed on demand from an index path instead of being stored in the nodes.

pub mod nodes;

pub use nodes::{CodeBlock, CustomNode, Document, Heading, Image, Link, List, ListItem, Node, Table};

/// Neighbours of a node inside its parent's child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Siblings<'a> {
    pub previous: Option<&'a Node>,
    pub next: Option<&'a Node>,
}

impl Document {
    /// Resolve an index path (one index per level) to a node.
    ///
    /// Children of a list item are addressed through the list: `[list, item, child]`.
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (last, parent) = path.split_last()?;
        self.children_at(parent)?.get(*last)
    }

    /// Previous and next siblings of the node at `path`.
    pub fn siblings(&self, path: &[usize]) -> Option<Siblings<'_>> {
        let (last, parent) = path.split_last()?;
        let slice = self.children_at(parent)?;
        slice.get(*last)?;
        Some(Siblings {
            previous: last.checked_sub(1).and_then(|i| slice.get(i)),
            next: slice.get(last + 1),
        })
    }

    /// The child list addressed by `path` (the document's own blocks for an empty path).
    fn children_at(&self, path: &[usize]) -> Option<&[Node]> {
        let mut slice = self.children.as_slice();
        let mut rest = path;
        while let Some((index, tail)) = rest.split_first() {
            match slice.get(*index)? {
                Node::List(list) => {
                    let (item, tail) = tail.split_first()?;
                    slice = &list.items.get(*item)?.children;
                    rest = tail;
                }
                node => {
                    slice = node.children();
                    rest = tail;
                }
            }
        }
        Some(slice)
    }
}
