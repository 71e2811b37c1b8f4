//! Text leaf enumeration
//!
//! The full text of a tree is the concatenation of its text leaves in
//! document order. Each leaf owns a half-open char range of that text.

use crate::markup::{MarkupTree, NodeData, NodeId};

/// Attribute that marks an element as a highlight wrapper
pub const HIGHLIGHT_MARKER_ATTR: &str = "data-entity-name";

/// A text node and the char range it covers in the full text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLeaf {
    /// The text node
    pub node: NodeId,
    /// First char offset (inclusive)
    pub start: usize,
    /// Last char offset (exclusive)
    pub end: usize,
    /// Inside an existing highlight; never split again
    pub locked: bool,
}

impl TextLeaf {
    /// Whether this leaf shares at least one char with `[start, end)`
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// The leaves of a tree and the text they spell out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLeaves {
    /// Non-empty leaves in document order
    pub leaves: Vec<TextLeaf>,
    /// Concatenated leaf text
    pub full_text: String,
}

impl TextLeaves {
    /// Walk `tree` in document order
    pub fn collect(tree: &MarkupTree) -> Self {
        let mut leaves = Vec::new();
        let mut full_text = String::new();
        let mut offset = 0;
        let mut stack = vec![(tree.root(), false)];

        while let Some((id, locked)) = stack.pop() {
            let Some(node) = tree.get(id) else {
                continue;
            };
            let locked = match node.data() {
                NodeData::Text(text) => {
                    let len = text.chars().count();
                    if len > 0 {
                        leaves.push(TextLeaf {
                            node: id,
                            start: offset,
                            end: offset + len,
                            locked,
                        });
                        full_text.push_str(text);
                        offset += len;
                    }
                    continue;
                }
                NodeData::Element(element) => {
                    locked || element.attr(HIGHLIGHT_MARKER_ATTR).is_some()
                }
                NodeData::Fragment => locked,
            };
            stack.extend(node.children().iter().rev().map(|&child| (child, locked)));
        }

        Self { leaves, full_text }
    }

    /// Total char length of the full text
    pub fn char_len(&self) -> usize {
        self.leaves.last().map_or(0, |leaf| leaf.end)
    }

    /// Index of the first leaf overlapping `[start, end)`
    pub fn owner_of(&self, start: usize, end: usize) -> Option<usize> {
        owner_of(&self.leaves, start, end)
    }
}

/// Index of the first leaf in `leaves` overlapping `[start, end)`
///
/// `leaves` must be sorted and non-overlapping.
pub(crate) fn owner_of(leaves: &[TextLeaf], start: usize, end: usize) -> Option<usize> {
    if start >= end {
        return None;
    }
    let first = leaves.partition_point(|leaf| leaf.end <= start);
    leaves
        .get(first)
        .filter(|leaf| leaf.overlaps(start, end))
        .map(|_| first)
}
