//! Markup sanitization
//!
//! Chapter markup comes from untrusted EPUB files and is always sanitized
//! before it is parsed for highlighting. The rest of the pipeline assumes
//! its input went through a [`Sanitizer`].

use crate::classify::BLOCK_KIND_ATTR;
use crate::markup::{parse_markup, MarkupTree, NodeData, NodeId};
use crate::walker::HIGHLIGHT_MARKER_ATTR;
use std::collections::BTreeSet;
use tracing::debug;

/// Tags, attributes and dropped containers of a sanitization policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    /// Elements kept as they are
    pub tags: BTreeSet<String>,
    /// Attributes kept on allowed elements; `data-*` is always kept except
    /// the attributes the renderer writes itself
    pub attributes: BTreeSet<String>,
    /// Elements removed together with their content
    pub drop_content: BTreeSet<String>,
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Default for AllowList {
    fn default() -> Self {
        Self::chapter()
    }
}

impl AllowList {
    /// Policy for book chapters: text structure and inline formatting
    pub fn chapter() -> Self {
        Self {
            tags: set(&[
                "a", "abbr", "article", "aside", "b", "blockquote", "br", "cite", "code", "dd",
                "del", "div", "dl", "dt", "em", "figcaption", "figure", "h1", "h2", "h3", "h4",
                "h5", "h6", "hr", "i", "img", "ins", "kbd", "li", "mark", "ol", "p", "pre", "q",
                "s", "section", "small", "span", "strong", "sub", "sup", "table", "tbody", "td",
                "tfoot", "th", "thead", "tr", "u", "ul",
            ]),
            attributes: set(&[
                "alt", "class", "colspan", "dir", "href", "id", "lang", "rowspan", "src", "title",
            ]),
            drop_content: set(&[
                "embed", "head", "iframe", "noscript", "object", "script", "style", "template",
                "title",
            ]),
        }
    }

    /// Text-only policy: every element is unwrapped
    pub fn text_only() -> Self {
        Self {
            tags: BTreeSet::new(),
            attributes: BTreeSet::new(),
            drop_content: Self::chapter().drop_content,
        }
    }

    /// Whether elements named `tag` are kept
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether attribute `name` with `value` is kept on an allowed element
    pub fn allows_attr(&self, name: &str, value: &str) -> bool {
        if name.starts_with("on") || is_reserved_attr(name) {
            return false;
        }
        if !(self.attributes.contains(name) || is_data_attr(name)) {
            return false;
        }
        if matches!(name, "href" | "src") && is_script_url(value) {
            return false;
        }
        true
    }
}

fn is_data_attr(name: &str) -> bool {
    name.strip_prefix("data-")
        .is_some_and(|rest| !rest.is_empty())
}

/// Attributes only the renderer may write
fn is_reserved_attr(name: &str) -> bool {
    name == HIGHLIGHT_MARKER_ATTR || name == BLOCK_KIND_ATTR
}

fn is_script_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();
    ["javascript:", "vbscript:", "data:text/html"]
        .iter()
        .any(|scheme| compact.starts_with(scheme))
}

/// Turns untrusted markup into safe markup
pub trait Sanitizer: Send + Sync {
    /// Sanitize `raw` under `policy`
    fn sanitize(&self, raw: &str, policy: &AllowList) -> String;
}

/// Rebuilds the parsed tree keeping only what the allow-list permits
///
/// Disallowed elements are unwrapped (their content stays), except those
/// in [`AllowList::drop_content`], which vanish with their content.
/// Highlight wrappers found in the input are unwrapped too, so their text
/// is matched again like any other text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowListSanitizer;

impl AllowListSanitizer {
    /// Sanitize an already parsed tree
    pub fn sanitize_tree(&self, source: &MarkupTree, policy: &AllowList) -> MarkupTree {
        let mut clean = MarkupTree::new();
        let root = clean.root();
        let mut removed = 0usize;
        for &child in source.children(source.root()) {
            copy_allowed(source, child, &mut clean, root, policy, &mut removed);
        }
        if removed > 0 {
            debug!("sanitizer removed {} element(s) or attribute(s)", removed);
        }
        clean
    }
}

impl Sanitizer for AllowListSanitizer {
    fn sanitize(&self, raw: &str, policy: &AllowList) -> String {
        self.sanitize_tree(&parse_markup(raw), policy).to_markup()
    }
}

fn copy_allowed(
    source: &MarkupTree,
    id: NodeId,
    dest: &mut MarkupTree,
    parent: NodeId,
    policy: &AllowList,
    removed: &mut usize,
) {
    let Some(node) = source.get(id) else {
        return;
    };

    match node.data() {
        NodeData::Fragment => {}
        NodeData::Text(text) => {
            dest.append_text(parent, text);
        }
        NodeData::Element(element) => {
            if policy.drop_content.contains(&element.name) {
                *removed += 1;
                return;
            }

            let forged = element.attr(HIGHLIGHT_MARKER_ATTR).is_some();
            let target = if policy.allows_tag(&element.name) && !forged {
                let mut kept = element.clone();
                let before = kept.attrs.len();
                kept.attrs
                    .retain(|(name, value)| policy.allows_attr(name, value));
                *removed += before - kept.attrs.len();
                dest.append_element(parent, kept)
            } else {
                *removed += 1;
                parent
            };

            for &child in node.children() {
                copy_allowed(source, child, dest, target, policy, removed);
            }
        }
    }
}

/// Passes markup through untouched
///
/// Only for markup that was sanitized upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedMarkup;

impl Sanitizer for TrustedMarkup {
    fn sanitize(&self, raw: &str, _policy: &AllowList) -> String {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str) -> String {
        AllowListSanitizer.sanitize(raw, &AllowList::chapter())
    }

    #[test]
    fn test_script_removed_with_content() {
        assert_eq!(
            clean("<p>Hi<script>alert(1)</script> there</p>"),
            "<p>Hi there</p>"
        );
    }

    #[test]
    fn test_unknown_tags_unwrapped() {
        assert_eq!(
            clean("<html><body><p>One <font>two</font></p></body></html>"),
            "<p>One two</p>"
        );
    }

    #[test]
    fn test_head_dropped() {
        assert_eq!(
            clean("<html><head><title>Ch 1</title></head><body><p>x</p></body></html>"),
            "<p>x</p>"
        );
    }

    #[test]
    fn test_event_handlers_and_script_urls_removed() {
        assert_eq!(
            clean(r#"<a href=" JavaScript:alert(1)" onclick="x()" title="t">link</a>"#),
            r#"<a title="t">link</a>"#
        );
        assert_eq!(
            clean(r#"<a href="https://example.org/" data-ref="n1">ok</a>"#),
            r#"<a href="https://example.org/" data-ref="n1">ok</a>"#
        );
    }

    #[test]
    fn test_text_only_policy() {
        let raw = "<p>a <b>b</b></p><style>p{}</style>";
        let text = AllowListSanitizer.sanitize(raw, &AllowList::text_only());
        assert_eq!(text, "a b");
    }

    #[test]
    fn test_trusted_passthrough() {
        let raw = "<p onclick=\"x\">kept</p>";
        assert_eq!(TrustedMarkup.sanitize(raw, &AllowList::chapter()), raw);
    }

    #[test]
    fn test_attribute_predicates() {
        let policy = AllowList::chapter();
        assert!(policy.allows_attr("data-ref", "x"));
        assert!(!policy.allows_attr("data-entity-name", "x"));
        assert!(!policy.allows_attr("data-block-kind", "dialogue"));
        assert!(!policy.allows_attr("data-", "x"));
        assert!(!policy.allows_attr("onload", "x"));
        assert!(!policy.allows_attr("style", "color: red"));
        assert!(!policy.allows_attr("src", "java\tscript:alert(1)"));
    }

    #[test]
    fn test_highlight_wrappers_from_input_unwrapped() {
        let raw = concat!(
            r#"<p data-block-kind="dialogue">"#,
            r#"<mark class="entity-mention" data-entity-name="Mira">Bob</mark>"#,
            " met Bob.</p>",
        );
        assert_eq!(clean(raw), "<p>Bob met Bob.</p>");
    }
}
