//! Alignment core for entity mention highlighting
//!
//! This crate holds the pure algorithms that place upstream annotations onto
//! a render target:
//!
//! - [`segment`]: exact mode. Offsets are trusted and the text is partitioned
//!   into plain and annotated [`Segment`]s.
//! - [`locate`]: fuzzy mode. Offsets are not trusted; anchors are searched in
//!   a normalized copy of the target and paired with occurrences in order.
//! - [`resolve_overlaps`]: longest-span-wins de-duplication shared by both.
//!
//! Nothing here fails: malformed annotations are dropped and the output simply
//! carries fewer highlights.
//!
//! ```rust
//! use limelight_core::{segment, Annotation};
//!
//! let text = "Alice met Bob.";
//! let annotations = vec![Annotation::new("Alice", "character", 0, 5)];
//! let segments = segment(text, &annotations);
//!
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].text, "Alice");
//! assert!(segments[0].annotation.is_some());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod annotation;
pub mod filter;
pub mod locate;
pub mod normalize;
pub mod offset;
pub mod overlap;
pub mod segment;

pub use annotation::{Annotation, MentionType, ParseMentionTypeError};
pub use filter::AnnotationFilter;
pub use locate::{find_occurrences, locate, locate_with, LocateOptions, Match};
pub use normalize::{normalize, normalize_char};
pub use offset::CharIndex;
pub use overlap::{resolve_overlaps, Span};
pub use segment::{
    segment, segment_at, segment_paragraphs, split_paragraphs, Paragraph, ParagraphSegments,
    Segment,
};
