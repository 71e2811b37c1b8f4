//! Fuzzy occurrence location
//!
//! When the render target is not the text the extractor saw (sanitized EPUB
//! markup, reflowed whitespace, curly quotes), offsets cannot be trusted.
//! Instead, each annotation's extraction text is searched in the normalized
//! target and annotations sharing the same extraction text are paired with
//! its occurrences in reading order:
//!
//! ```text
//! target:       "Alice met Bob. Alice left."
//! occurrences:   ^0             ^15
//! annotations:  Alice@0, Alice@15  (sorted by original offset)
//! pairs:        (Alice@0 -> 0), (Alice@15 -> 15)
//! ```
//!
//! Pairing assumes the rendered text keeps the relative order of repeated
//! mentions. Nothing validates that assumption.

use crate::annotation::Annotation;
use crate::normalize::normalize;
use crate::offset::CharIndex;
use crate::overlap::{resolve_overlaps, Span};
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Thresholds for anchor searching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    /// Extraction texts shorter than this (in chars) are not searched
    pub min_anchor_chars: usize,
    /// Anchors longer than this (in chars, after normalization) are
    /// searched by prefix only
    pub max_anchor_chars: usize,
    /// Prefix length used for long anchors
    pub anchor_prefix_chars: usize,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            min_anchor_chars: 2,
            max_anchor_chars: 80,
            anchor_prefix_chars: 60,
        }
    }
}

/// One annotation placed on the full-text offset space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    /// Start char offset (inclusive)
    pub start: usize,
    /// End char offset (exclusive)
    pub end: usize,
    /// The annotation placed here
    pub annotation: &'a Annotation,
}

impl Span for Match<'_> {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

/// Byte offsets of all non-overlapping occurrences of `needle`, left to right
///
/// An empty needle has no occurrences.
pub fn find_occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    let mut hits = Vec::new();
    if needle.is_empty() {
        return hits;
    }

    let mut cursor = 0;
    while let Some(pos) = haystack[cursor..].find(needle) {
        let at = cursor + pos;
        hits.push(at);
        cursor = at + needle.len();
    }

    hits
}

/// Locate annotations in `normalized_text` with default thresholds
pub fn locate<'a, I>(normalized_text: &str, annotations: I) -> Vec<Match<'a>>
where
    I: IntoIterator<Item = &'a Annotation>,
{
    locate_with(normalized_text, annotations, &LocateOptions::default())
}

/// Locate annotations in `normalized_text`
///
/// `normalized_text` must already be passed through
/// [`normalize`](crate::normalize::normalize). The returned matches are
/// sorted by start and never overlap.
pub fn locate_with<'a, I>(
    normalized_text: &str,
    annotations: I,
    options: &LocateOptions,
) -> Vec<Match<'a>>
where
    I: IntoIterator<Item = &'a Annotation>,
{
    let mut groups: BTreeMap<&'a str, Vec<&'a Annotation>> = BTreeMap::new();
    for annotation in annotations {
        let key = annotation.extraction_text.as_str();
        if key.chars().count() < options.min_anchor_chars {
            continue;
        }
        groups.entry(key).or_default().push(annotation);
    }

    let index = CharIndex::new(normalized_text);
    let text_len = index.char_len();
    let mut matches = Vec::new();

    for (key, mut group) in groups {
        group.sort_by_key(|a| a.char_offset_start);

        let anchor = normalize(key);
        // Normalization maps char to char, so this is also the raw length.
        let anchor_len = anchor.chars().count();
        let search_key = if anchor_len > options.max_anchor_chars {
            let cut = anchor
                .char_indices()
                .nth(options.anchor_prefix_chars)
                .map_or(anchor.len(), |(i, _)| i);
            &anchor[..cut]
        } else {
            &anchor[..]
        };

        let occurrences = find_occurrences(normalized_text, search_key);
        for (annotation, byte_start) in group.into_iter().zip(occurrences) {
            let Some(start) = index.char_offset(byte_start) else {
                continue;
            };
            matches.push(Match {
                start,
                end: (start + anchor_len).min(text_len),
                annotation,
            });
        }
    }

    matches.sort_by_key(|m| m.start);
    resolve_overlaps(matches)
}
