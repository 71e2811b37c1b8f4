//! Lenient markup parsing
//!
//! Chapter markup is XHTML from EPUB content documents, usually well
//! formed but not always. Parsing follows the HTML5 fragment algorithm, so
//! it never fails: stray end tags are ignored, unclosed elements are closed
//! where HTML would close them, a bare `<` stays text and every HTML5 named
//! character reference is resolved.

use super::tree::{Element, MarkupTree, NodeId};
use scraper::{ElementRef, Html};
use tracing::debug;

/// Elements that never have content
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Whether `name` is a void element
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Parse a markup fragment into a tree
///
/// Document wrappers (`html`, `head`, `body`) are dropped; their content is
/// kept. Comments, doctypes and processing instructions are skipped.
pub fn parse_markup(markup: &str) -> MarkupTree {
    let html = Html::parse_fragment(markup);
    if !html.errors.is_empty() {
        debug!("recovered from {} markup error(s)", html.errors.len());
    }

    let mut tree = MarkupTree::new();
    let root = tree.root();
    copy_children(html.root_element(), &mut tree, root);
    tree
}

fn copy_children(source: ElementRef<'_>, tree: &mut MarkupTree, parent: NodeId) {
    for child in source.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let value = child_element.value();
            let mut element = Element::new(value.name().to_ascii_lowercase());
            for (name, attr) in value.attrs() {
                if element.attr(name).is_none() {
                    element.attrs.push((name.to_ascii_lowercase(), attr.to_string()));
                }
            }
            let id = tree.append_element(parent, element);
            copy_children(child_element, tree, id);
        } else if let Some(text) = child.value().as_text() {
            tree.append_text(parent, text);
        }
    }
}
