//! Markup trees: parsing, traversal and serialization

mod parse;
mod serialize;
mod tree;

pub use parse::{is_void, parse_markup, VOID_ELEMENTS};
pub use tree::{Descendants, Element, MarkupTree, Node, NodeData, NodeId};
