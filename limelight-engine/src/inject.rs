//! Highlight injection
//!
//! Wraps located matches in highlight elements. Injection is a pure
//! transform: the input tree is cloned and never touched, so re-rendering
//! from the same pristine tree with another set of matches starts clean.
//!
//! Matches are applied from the end of the text backwards. A match that
//! spans several leaves is truncated to the first leaf it touches:
//!
//! ```text
//! full text:  "Sir <b>Alaric</b> the Bold"
//! match:       [0, 10)  "Sir Alaric"
//! owner leaf:  "Sir "  -> <mark>Sir </mark><b>Alaric</b> the Bold
//! ```

use crate::markup::{Element, MarkupTree, NodeData, NodeId};
use crate::walker::{owner_of, TextLeaf, TextLeaves, HIGHLIGHT_MARKER_ATTR};
use limelight_core::{Annotation, CharIndex, Match, Segment};
use tracing::trace;

/// How highlight wrappers look
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Wrapper tag
    pub tag: String,
    /// Wrapper class
    pub class: String,
    /// Extraction text in the wrapper is cut to this many chars
    pub extraction_preview_chars: usize,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            tag: "mark".to_string(),
            class: "entity-mention".to_string(),
            extraction_preview_chars: 100,
        }
    }
}

impl HighlightOptions {
    /// The wrapper element for `annotation`
    ///
    /// Every value lands in an attribute and is escaped on serialization,
    /// so annotation text never becomes markup.
    pub fn wrapper(&self, annotation: &Annotation) -> Element {
        let preview: String = annotation
            .extraction_text
            .chars()
            .take(self.extraction_preview_chars)
            .collect();

        Element::new(self.tag.clone())
            .with_attr("class", self.class.clone())
            .with_attr(HIGHLIGHT_MARKER_ATTR, annotation.entity_name.clone())
            .with_attr("data-entity-type", annotation.entity_type.clone())
            .with_attr("data-mention-type", annotation.mention_type.as_str())
            .with_attr("data-extraction-text", preview)
            .with_attr("data-confidence", format!("{:.2}", annotation.confidence))
    }
}

/// Outcome of one injection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectReport {
    /// Matches turned into wrappers
    pub applied: usize,
    /// Matches that found no splittable leaf
    pub skipped: usize,
}

/// Wrap `matches` in `tree`, returning the highlighted copy
///
/// Matches should come from [`limelight_core::locate`] over the tree's
/// normalized full text. A match whose range touches no leaf, or whose
/// first leaf already sits inside a highlight, is skipped.
pub fn inject(
    tree: &MarkupTree,
    matches: &[Match<'_>],
    options: &HighlightOptions,
) -> (MarkupTree, InjectReport) {
    let mut out = tree.clone();
    let mut leaves = TextLeaves::collect(&out).leaves;
    let mut report = InjectReport::default();

    let mut order: Vec<&Match<'_>> = matches.iter().collect();
    order.sort_by(|a, b| b.start.cmp(&a.start));

    for m in order {
        let Some(index) = owner_of(&leaves, m.start, m.end) else {
            trace!("no leaf for match [{}, {})", m.start, m.end);
            report.skipped += 1;
            continue;
        };
        let leaf = leaves[index];
        if leaf.locked {
            trace!("leaf for match [{}, {}) is already highlighted", m.start, m.end);
            report.skipped += 1;
            continue;
        }

        match split_leaf(&mut out, leaf, m, options) {
            Some(pieces) => {
                leaves.splice(index..=index, pieces);
                report.applied += 1;
            }
            None => report.skipped += 1,
        }
    }

    (out, report)
}

/// Replace `leaf` by `[before, wrapper, after]`, returning the new leaves
fn split_leaf(
    tree: &mut MarkupTree,
    leaf: TextLeaf,
    m: &Match<'_>,
    options: &HighlightOptions,
) -> Option<Vec<TextLeaf>> {
    let text = tree.text(leaf.node)?.to_string();
    let local_start = m.start.max(leaf.start) - leaf.start;
    let local_end = m.end.min(leaf.end) - leaf.start;

    let index = CharIndex::new(&text);
    let before = index.slice(&text, 0, local_start)?;
    let matched = index.slice(&text, local_start, local_end)?;
    let after = index.slice(&text, local_end, index.char_len())?;

    let mut replacements: Vec<NodeId> = Vec::with_capacity(3);
    let mut pieces = Vec::with_capacity(3);
    let at = |node: NodeId, from: usize, to: usize, locked: bool| TextLeaf {
        node,
        start: leaf.start + from,
        end: leaf.start + to,
        locked,
    };

    if !before.is_empty() {
        let node = tree.create(NodeData::Text(before.to_string()));
        replacements.push(node);
        pieces.push(at(node, 0, local_start, false));
    }

    // The wrapper takes the leaf's place among its siblings; its text is the
    // new, locked leaf.
    let wrapper = tree.create(NodeData::Element(options.wrapper(m.annotation)));
    let inner = tree.create(NodeData::Text(matched.to_string()));
    tree.append(wrapper, inner);
    replacements.push(wrapper);
    pieces.push(at(inner, local_start, local_end, true));

    if !after.is_empty() {
        let node = tree.create(NodeData::Text(after.to_string()));
        replacements.push(node);
        pieces.push(at(node, local_end, index.char_len(), false));
    }

    tree.replace(leaf.node, &replacements).then_some(pieces)
}

impl MarkupTree {
    /// Build a fragment from exact-offset segments
    ///
    /// Annotated segments are wrapped exactly like injected matches.
    pub fn from_segments(segments: &[Segment<'_, '_>], options: &HighlightOptions) -> Self {
        let mut tree = MarkupTree::new();
        let root = tree.root();
        tree.append_segments(root, segments, options);
        tree
    }

    /// Append `segments` under `parent`
    pub fn append_segments(
        &mut self,
        parent: NodeId,
        segments: &[Segment<'_, '_>],
        options: &HighlightOptions,
    ) {
        for segment in segments {
            match segment.annotation {
                Some(annotation) => {
                    let wrapper = self.append_element(parent, options.wrapper(annotation));
                    self.append_text(wrapper, segment.text);
                }
                None => {
                    self.append_text(parent, segment.text);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;
    use limelight_core::{locate, normalize};

    fn highlight(markup: &str, annotations: &[Annotation]) -> (String, InjectReport) {
        let tree = parse_markup(markup);
        let leaves = TextLeaves::collect(&tree);
        let normalized = normalize(&leaves.full_text);
        let matches = locate(&normalized, annotations);
        let (out, report) = inject(&tree, &matches, &HighlightOptions::default());
        (out.to_markup(), report)
    }

    #[test]
    fn test_single_highlight() {
        let (html, report) = highlight(
            "<p>Alice met Bob.</p>",
            &[Annotation::new("Bob", "character", 10, 13)],
        );
        assert_eq!(report, InjectReport { applied: 1, skipped: 0 });
        assert!(html.starts_with("<p>Alice met <mark class=\"entity-mention\" data-entity-name=\"Bob\""));
        assert!(html.ends_with(">Bob</mark>.</p>"));
    }

    #[test]
    fn test_multiple_highlights_in_one_leaf() {
        let (html, report) = highlight(
            "<p>Alice met Bob.</p>",
            &[
                Annotation::new("Alice", "character", 0, 5),
                Annotation::new("Bob", "character", 10, 13),
            ],
        );
        assert_eq!(report.applied, 2);
        assert_eq!(html.matches("<mark").count(), 2);
        let tree = parse_markup(&html);
        assert_eq!(tree.text_content(tree.root()), "Alice met Bob.");
    }

    #[test]
    fn test_match_truncated_to_first_leaf() {
        let tree = parse_markup("<p>Sir <b>Alaric</b> rode.</p>");
        let annotation = Annotation::new("Sir Alaric", "character", 0, 10);
        let matches = vec![Match {
            start: 0,
            end: 10,
            annotation: &annotation,
        }];
        let (out, report) = inject(&tree, &matches, &HighlightOptions::default());

        assert_eq!(report.applied, 1);
        let html = out.to_markup();
        assert!(html.contains(">Sir </mark><b>Alaric</b>"));
    }

    #[test]
    fn test_pristine_tree_untouched() {
        let tree = parse_markup("<p>Alice met Bob.</p>");
        let before = tree.to_markup();
        let annotation = Annotation::new("Bob", "character", 10, 13);
        let matches = vec![Match {
            start: 10,
            end: 13,
            annotation: &annotation,
        }];
        let _ = inject(&tree, &matches, &HighlightOptions::default());
        assert_eq!(tree.to_markup(), before);
    }

    #[test]
    fn test_existing_highlight_not_split() {
        let markup = r#"<p><mark data-entity-name="Bob">Bob</mark> ran</p>"#;
        let tree = parse_markup(markup);
        let annotation = Annotation::new("Bob", "character", 0, 3);
        let matches = vec![Match {
            start: 0,
            end: 3,
            annotation: &annotation,
        }];
        let (out, report) = inject(&tree, &matches, &HighlightOptions::default());
        assert_eq!(report, InjectReport { applied: 0, skipped: 1 });
        assert_eq!(out.to_markup(), markup);
    }

    #[test]
    fn test_out_of_range_match_skipped() {
        let tree = parse_markup("<p>short</p>");
        let annotation = Annotation::new("x", "t", 0, 1);
        let matches = vec![Match {
            start: 40,
            end: 44,
            annotation: &annotation,
        }];
        let (out, report) = inject(&tree, &matches, &HighlightOptions::default());
        assert_eq!(report.skipped, 1);
        assert_eq!(out.to_markup(), "<p>short</p>");
    }

    #[test]
    fn test_overlapping_matches_second_loses() {
        let tree = parse_markup("<p>abcdefgh</p>");
        let a = Annotation::new("a", "t", 0, 0);
        let b = Annotation::new("b", "t", 0, 0);
        let matches = vec![
            Match { start: 1, end: 5, annotation: &a },
            Match { start: 3, end: 7, annotation: &b },
        ];
        let (out, report) = inject(&tree, &matches, &HighlightOptions::default());
        // [3,7) goes first; [1,5) then owns the unlocked "bc" before it.
        assert_eq!(report.applied, 2);
        let rendered = parse_markup(&out.to_markup());
        assert_eq!(rendered.text_content(rendered.root()), "abcdefgh");
    }

    #[test]
    fn test_wrapper_attributes() {
        let annotation = Annotation::new("Bob", "character", 0, 3)
            .with_extraction_text("b".repeat(150))
            .with_confidence(0.876);
        let wrapper = HighlightOptions::default().wrapper(&annotation);
        assert_eq!(wrapper.name, "mark");
        assert_eq!(wrapper.attr("data-entity-type"), Some("character"));
        assert_eq!(wrapper.attr("data-mention-type"), Some("direct_name"));
        assert_eq!(wrapper.attr("data-confidence"), Some("0.88"));
        assert_eq!(wrapper.attr("data-extraction-text").map(|t| t.len()), Some(100));
    }

    #[test]
    fn test_from_segments_matches_injected_shape() {
        let annotation = Annotation::new("Bob", "character", 10, 13);
        let text = "Alice met Bob.";
        let segments = limelight_core::segment(text, [&annotation]);
        let built = MarkupTree::from_segments(&segments, &HighlightOptions::default());

        let (html, _) = highlight(text, &[annotation.clone()]);
        assert_eq!(built.to_markup(), html);
    }
}
