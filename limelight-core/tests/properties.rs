//! Property-based tests for segmentation and location invariants.

use limelight_core::*;
use proptest::prelude::*;

fn annotation_strategy() -> impl Strategy<Value = Annotation> {
    (-5i64..60, -5i64..60).prop_map(|(start, end)| Annotation::new("x", "t", start, end))
}

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zA-Z é\u{2019}\u{2014}\u{00A0}.]{0,50}").unwrap()
}

proptest! {
    #[test]
    fn segments_cover_text_exactly(
        text in text_strategy(),
        annotations in proptest::collection::vec(annotation_strategy(), 0..12),
    ) {
        let segments = segment(&text, &annotations);
        let joined: String = segments.iter().map(|s| s.text).collect();
        prop_assert_eq!(joined.as_str(), text.as_str());
        prop_assert!(segments.iter().all(|s| !s.text.is_empty()));
    }

    #[test]
    fn resolved_spans_never_overlap(
        raw in proptest::collection::vec((0usize..100, 1usize..20), 0..30),
    ) {
        let mut spans: Vec<(usize, usize)> =
            raw.into_iter().map(|(start, len)| (start, start + len)).collect();
        spans.sort_by_key(|s| s.0);
        let resolved = resolve_overlaps(spans);
        for pair in resolved.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].0);
        }
    }

    #[test]
    fn normalization_preserves_char_count(text in text_strategy()) {
        prop_assert_eq!(normalize(&text).chars().count(), text.chars().count());
    }

    #[test]
    fn located_matches_are_ordered_and_in_bounds(
        text in text_strategy(),
        anchors in proptest::collection::vec("[a-z]{2,4}", 0..6),
    ) {
        let annotations: Vec<Annotation> = anchors
            .iter()
            .enumerate()
            .map(|(i, anchor)| {
                Annotation::new(anchor.clone(), "t", i as i64, i as i64 + 2)
            })
            .collect();
        let normalized = normalize(&text);
        let len = normalized.chars().count();
        let matches = locate(&normalized, &annotations);

        for m in &matches {
            prop_assert!(m.start < m.end && m.end <= len);
        }
        for pair in matches.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }
}
