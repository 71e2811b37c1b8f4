//! Exact-offset segmentation
//!
//! Used when the annotation offsets and the render target come from the same
//! canonical text. The output partitions the text: concatenating every
//! segment's `text` gives back the input, byte for byte.

use crate::annotation::Annotation;
use crate::offset::CharIndex;
use crate::overlap::{resolve_overlaps, Span};
use alloc::vec::Vec;

/// A contiguous run of text, optionally tagged with one annotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'t, 'a> {
    /// The text of the run, borrowed from the source
    pub text: &'t str,
    /// The annotation covering the run, if any
    pub annotation: Option<&'a Annotation>,
}

impl<'t, 'a> Segment<'t, 'a> {
    /// Plain, unannotated run
    pub fn plain(text: &'t str) -> Self {
        Self {
            text,
            annotation: None,
        }
    }

    /// Whether this run carries an annotation
    pub fn is_annotated(&self) -> bool {
        self.annotation.is_some()
    }
}

/// An annotation resolved to local char offsets
#[derive(Debug, Clone, Copy)]
struct Placed<'a> {
    start: usize,
    end: usize,
    annotation: &'a Annotation,
}

impl Span for Placed<'_> {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

/// Segment `text` whose first char sits at offset 0 of the annotation space
pub fn segment<'t, 'a, I>(text: &'t str, annotations: I) -> Vec<Segment<'t, 'a>>
where
    I: IntoIterator<Item = &'a Annotation>,
{
    segment_at(text, 0, annotations)
}

/// Segment `text` whose first char sits at `char_offset` of the annotation space
///
/// Annotations that do not lie entirely inside
/// `[char_offset, char_offset + len)` are dropped, as are negative and empty
/// spans.
pub fn segment_at<'t, 'a, I>(
    text: &'t str,
    char_offset: usize,
    annotations: I,
) -> Vec<Segment<'t, 'a>>
where
    I: IntoIterator<Item = &'a Annotation>,
{
    let index = CharIndex::new(text);
    let len = index.char_len();

    let mut placed: Vec<Placed<'a>> = annotations
        .into_iter()
        .filter_map(|annotation| {
            let (start, end) = annotation.span_within(char_offset, len)?;
            Some(Placed {
                start,
                end,
                annotation,
            })
        })
        .collect();
    placed.sort_by_key(|p| p.start);

    let resolved = resolve_overlaps(placed);
    let mut segments = Vec::with_capacity(resolved.len() * 2 + 1);
    let mut cursor = 0;

    for p in resolved {
        // Spans were validated against `len`, so the lookups cannot miss.
        let (Some(start), Some(end)) = (index.byte_offset(p.start), index.byte_offset(p.end))
        else {
            continue;
        };
        if start > cursor {
            segments.push(Segment::plain(&text[cursor..start]));
        }
        segments.push(Segment {
            text: &text[start..end],
            annotation: Some(p.annotation),
        });
        cursor = end;
    }

    if cursor < text.len() {
        segments.push(Segment::plain(&text[cursor..]));
    }

    segments
}

/// One paragraph of a chapter and its char offset in the chapter text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph<'t> {
    /// Paragraph text
    pub text: &'t str,
    /// Char offset of the paragraph's first char in the chapter
    pub char_offset: usize,
}

impl<'t> Paragraph<'t> {
    /// Create a paragraph starting at `char_offset`
    pub fn new(text: &'t str, char_offset: usize) -> Self {
        Self { text, char_offset }
    }
}

/// Segments of a single paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphSegments<'t, 'a> {
    /// The paragraph that was segmented
    pub paragraph: Paragraph<'t>,
    /// Its segments
    pub segments: Vec<Segment<'t, 'a>>,
}

/// Split a chapter into paragraphs on line breaks
///
/// Blank lines are skipped; a trailing `\r` is not part of the paragraph.
/// Offsets are char offsets into `text`.
pub fn split_paragraphs(text: &str) -> Vec<Paragraph<'_>> {
    let mut paragraphs = Vec::new();
    let mut char_offset = 0;

    for line in text.split('\n') {
        let body = line.strip_suffix('\r').unwrap_or(line);
        if !body.trim().is_empty() {
            paragraphs.push(Paragraph::new(body, char_offset));
        }
        // +1 for the '\n' consumed by split
        char_offset += line.chars().count() + 1;
    }

    paragraphs
}

/// Segment every paragraph against chapter-level annotations
///
/// Each annotation is rebased onto the paragraph containing it; annotations
/// crossing a paragraph boundary match no paragraph and are dropped.
pub fn segment_paragraphs<'t, 'a, I>(
    paragraphs: &[Paragraph<'t>],
    annotations: I,
) -> Vec<ParagraphSegments<'t, 'a>>
where
    I: IntoIterator<Item = &'a Annotation>,
{
    let annotations: Vec<&'a Annotation> = annotations.into_iter().collect();

    paragraphs
        .iter()
        .map(|paragraph| ParagraphSegments {
            paragraph: *paragraph,
            segments: segment_at(
                paragraph.text,
                paragraph.char_offset,
                annotations.iter().copied(),
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    fn concat(segments: &[Segment<'_, '_>]) -> String {
        segments.iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_no_annotations_single_segment() {
        let segments = segment("The tavern was quiet.", &[]);
        assert_eq!(segments, vec![Segment::plain("The tavern was quiet.")]);
    }

    #[test]
    fn test_empty_text() {
        let annotations = vec![Annotation::new("x", "t", 0, 1)];
        assert!(segment("", &annotations).is_empty());
    }

    #[test]
    fn test_gap_annotation_trailing() {
        let text = "Alice met Bob.";
        let annotations = vec![
            Annotation::new("Bob", "character", 10, 13),
            Annotation::new("Alice", "character", 0, 5),
        ];
        let segments = segment(text, &annotations);

        let texts: Vec<&str> = segments.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["Alice", " met ", "Bob", "."]);
        assert_eq!(segments[0].annotation.unwrap().entity_name, "Alice");
        assert!(!segments[1].is_annotated());
        assert_eq!(segments[2].annotation.unwrap().entity_name, "Bob");
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_out_of_bounds_dropped() {
        let text = "short";
        let annotations = vec![Annotation::new("x", "t", 2, 99)];
        let segments = segment(text, &annotations);
        assert_eq!(segments, vec![Segment::plain("short")]);
    }

    #[test]
    fn test_overlap_longest_wins() {
        let text = "abcdefghijkl";
        let annotations = vec![
            Annotation::new("short", "t", 4, 6),
            Annotation::new("long", "t", 2, 10),
        ];
        let segments = segment(text, &annotations);
        let annotated: Vec<_> = segments.iter().filter(|s| s.is_annotated()).collect();
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].text, "cdefghij");
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let text = "Ärger traf Zoë.";
        let annotations = vec![Annotation::new("Zoë", "character", 11, 14)];
        let segments = segment(text, &annotations);
        assert_eq!(segments[1].text, "Zoë");
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_segment_at_rebases() {
        let annotations = vec![Annotation::new("Bob", "character", 104, 107)];
        let segments = segment_at("Hi, Bob!", 100, &annotations);
        assert_eq!(segments[1].text, "Bob");
    }

    #[test]
    fn test_split_paragraphs_offsets() {
        let text = "First line.\r\n\nSecond\u{2019}s line.\n   \nThird.";
        let paragraphs = split_paragraphs(text);
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0], Paragraph::new("First line.", 0));
        assert_eq!(paragraphs[1], Paragraph::new("Second\u{2019}s line.", 14));
        assert_eq!(paragraphs[2].text, "Third.");
        assert_eq!(paragraphs[2].char_offset, 33);
    }

    #[test]
    fn test_segment_paragraphs_drops_crossing_annotations() {
        let text = "Alice ran.\nBob hid.";
        let paragraphs = split_paragraphs(text);
        let annotations = vec![
            Annotation::new("Alice", "character", 0, 5),
            Annotation::new("Bob", "character", 11, 14),
            Annotation::new("crossing", "t", 8, 13),
        ];
        let rendered = segment_paragraphs(&paragraphs, &annotations);

        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].segments[0].text, "Alice");
        assert_eq!(rendered[1].segments[0].text, "Bob");
        let annotated: usize = rendered
            .iter()
            .map(|p| p.segments.iter().filter(|s| s.is_annotated()).count())
            .sum();
        assert_eq!(annotated, 2);
    }
}
