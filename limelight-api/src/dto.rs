//! Data Transfer Objects for API

use crate::error::{ApiError, Result};
use limelight_core::Annotation;
use limelight_engine::{RenderStats, Segment};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Input source for rendering
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Input {
    /// Raw text or markup
    Text(String),
    /// File path
    File(PathBuf),
    /// Raw bytes (UTF-8)
    Bytes(Vec<u8>),
    /// Reader (not serializable)
    #[cfg_attr(feature = "serde", serde(skip))]
    Reader(Box<dyn Read>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<dyn Read>").finish(),
        }
    }
}

impl Input {
    /// Create input from text
    pub fn from_text(text: impl Into<String>) -> Self {
        Input::Text(text.into())
    }

    /// Create input from file path
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Input::File(path.into())
    }

    /// Create input from bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }

    /// Create input from a reader
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }

    /// Read the text content from the input
    pub fn read_text(self) -> Result<String> {
        match self {
            Input::Text(text) => Ok(text),
            Input::File(path) => fs::read_to_string(&path).map_err(ApiError::Io),
            Input::Bytes(bytes) => String::from_utf8(bytes).map_err(ApiError::Utf8),
            Input::Reader(mut reader) => {
                let mut buffer = String::new();
                reader.read_to_string(&mut buffer).map_err(ApiError::Io)?;
                Ok(buffer)
            }
        }
    }
}

/// A run of text, with the annotation covering it if any
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentDTO {
    /// Segment text
    pub text: String,
    /// Covering annotation
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub annotation: Option<Annotation>,
}

impl From<&Segment<'_, '_>> for SegmentDTO {
    fn from(segment: &Segment<'_, '_>) -> Self {
        Self {
            text: segment.text.to_string(),
            annotation: segment.annotation.cloned(),
        }
    }
}

/// One rendered paragraph
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParagraphDTO {
    /// Char offset of the paragraph in the chapter
    pub char_offset: usize,
    /// Block kind label
    pub block_kind: String,
    /// Segments of the paragraph
    pub segments: Vec<SegmentDTO>,
}

/// Render result in the shape of its source kind
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "mode", rename_all = "snake_case")
)]
pub enum Rendered {
    /// Segments of a whole text
    Segments {
        /// Segments in order
        segments: Vec<SegmentDTO>,
    },
    /// Segmented paragraphs
    Paragraphs {
        /// Paragraphs in order
        paragraphs: Vec<ParagraphDTO>,
    },
    /// Highlighted markup
    Markup {
        /// Serialized markup
        html: String,
    },
}

impl Rendered {
    /// Plain text of the render, without any highlighting
    pub fn plain_text(&self) -> String {
        match self {
            Rendered::Segments { segments } => segments.iter().map(|s| s.text.as_str()).collect(),
            Rendered::Paragraphs { paragraphs } => paragraphs
                .iter()
                .map(|p| p.segments.iter().map(|s| s.text.as_str()).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n"),
            Rendered::Markup { html } => {
                let tree = limelight_engine::parse_markup(html);
                tree.text_content(tree.root())
            }
        }
    }
}

/// Render metadata with runtime statistics
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// Source kind that was rendered
    pub source_kind: String,
    /// Characters in the source
    pub total_chars: usize,
    /// Annotations passed in
    pub annotations_total: usize,
    /// Annotations hidden by the filter
    pub annotations_filtered: usize,
    /// Visible annotations that produced no highlight
    pub annotations_dropped: usize,
    /// Highlights in the output
    pub highlights: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: f64,
}

impl Metadata {
    /// Metadata from engine statistics
    pub fn from_stats(source_kind: &str, total_chars: usize, stats: &RenderStats) -> Self {
        Self {
            source_kind: source_kind.to_string(),
            total_chars,
            annotations_total: stats.annotations_total,
            annotations_filtered: stats.annotations_filtered,
            annotations_dropped: stats.annotations_dropped,
            highlights: stats.highlights,
            processing_time_ms: stats.processing_time.as_secs_f64() * 1000.0,
        }
    }
}

/// Complete output of one render
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Output {
    /// Structured render result
    pub rendered: Rendered,
    /// The render as markup, whatever the source kind
    pub html: String,
    /// Render metadata
    pub metadata: Metadata,
}

impl Output {
    /// Serialize to pretty JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ApiError::Serde)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_is_tagged_by_mode() {
        let rendered = Rendered::Markup {
            html: "<p>x</p>".to_string(),
        };
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["mode"], "markup");
        assert_eq!(json["html"], "<p>x</p>");
    }

    #[test]
    fn test_plain_segments_omit_annotation() {
        let segment = SegmentDTO {
            text: "plain".to_string(),
            annotation: None,
        };
        let json = serde_json::to_string(&segment).unwrap();
        assert_eq!(json, r#"{"text":"plain"}"#);
    }

    #[test]
    fn test_plain_text_of_paragraphs() {
        let rendered = Rendered::Paragraphs {
            paragraphs: vec![
                ParagraphDTO {
                    char_offset: 0,
                    block_kind: "narrative".into(),
                    segments: vec![SegmentDTO {
                        text: "One.".into(),
                        annotation: None,
                    }],
                },
                ParagraphDTO {
                    char_offset: 5,
                    block_kind: "narrative".into(),
                    segments: vec![SegmentDTO {
                        text: "Two.".into(),
                        annotation: None,
                    }],
                },
            ],
        };
        assert_eq!(rendered.plain_text(), "One.\nTwo.");
    }
}
