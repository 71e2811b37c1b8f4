//! Public API for Limelight entity mention highlighting
//!
//! This crate provides a stable interface over the render engine: give it
//! chapter text or chapter markup plus annotations, get back highlighted
//! output and render statistics.
//!
//! ```rust
//! use limelight_api::{Annotation, Config, Highlighter, Input, SourceKind};
//!
//! let config = Config::builder().source_kind(SourceKind::Markup).build()?;
//! let highlighter = Highlighter::with_config(config)?;
//! let annotations = vec![Annotation::new("Mira", "character", 0, 4)];
//! let output = highlighter.render(Input::from_text("<p>Mira smiled.</p>"), &annotations)?;
//! assert_eq!(output.metadata.highlights, 1);
//! # Ok::<(), limelight_api::ApiError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod dto;
pub mod error;

use dto::{Metadata, ParagraphDTO, Rendered, SegmentDTO};
use error::Result;
use limelight_engine::{AllowListSanitizer, Renderer, RendererBuilder, Sanitizer, TrustedMarkup};
use std::path::Path;
use std::sync::Arc;

// Re-export key types
pub use config::{Config, ConfigBuilder};
pub use dto::{Input, Output};
pub use error::ApiError;
pub use limelight_core::{Annotation, MentionType};
pub use limelight_engine::SourceKind;

/// Main entry point for highlighting
pub struct Highlighter {
    inner: Arc<Renderer>,
    config: Config,
}

impl Highlighter {
    /// Create a highlighter with default configuration (text source)
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a highlighter for a source kind
    pub fn with_source_kind(kind: SourceKind) -> Result<Self> {
        let config = Config::builder().source_kind(kind).build()?;
        Self::with_config(config)
    }

    /// Create a highlighter with custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let sanitizer: Arc<dyn Sanitizer> = if config.trusted_markup {
            Arc::new(TrustedMarkup)
        } else {
            Arc::new(AllowListSanitizer)
        };

        let inner = RendererBuilder::new()
            .config(config.inner.clone())
            .sanitizer(sanitizer)
            .build()?;

        Ok(Self {
            inner: Arc::new(inner),
            config,
        })
    }

    /// Render input as the configured source kind
    pub fn render(&self, input: Input, annotations: &[Annotation]) -> Result<Output> {
        self.render_as(input, annotations, self.config.source_kind)
    }

    /// Render input as `kind`
    pub fn render_as(
        &self,
        input: Input,
        annotations: &[Annotation],
        kind: SourceKind,
    ) -> Result<Output> {
        let source = input.read_text()?;
        let total_chars = source.chars().count();
        let highlight = &self.config.inner.highlight;

        let (rendered, html, stats) = match kind {
            SourceKind::Text => {
                let out = self.inner.render_text(&source, annotations);
                let html = out.to_tree(highlight).to_markup();
                let segments = out.segments.iter().map(SegmentDTO::from).collect();
                (Rendered::Segments { segments }, html, out.stats)
            }
            SourceKind::Paragraphs => {
                let out = self.inner.render_chapter(&source, annotations);
                let html = out.to_tree(highlight).to_markup();
                let paragraphs = out
                    .paragraphs
                    .iter()
                    .map(|p| ParagraphDTO {
                        char_offset: p.paragraph.char_offset,
                        block_kind: p.block_kind.clone(),
                        segments: p.segments.iter().map(SegmentDTO::from).collect(),
                    })
                    .collect();
                (Rendered::Paragraphs { paragraphs }, html, out.stats)
            }
            SourceKind::Markup => {
                let out = self.inner.render_markup(&source, annotations);
                let html = out.to_markup();
                (Rendered::Markup { html: html.clone() }, html, out.stats)
            }
        };

        Ok(Output {
            rendered,
            html,
            metadata: Metadata::from_stats(kind.as_str(), total_chars, &stats),
        })
    }

    /// Render text directly (convenience method)
    pub fn render_text(&self, text: &str, annotations: &[Annotation]) -> Result<Output> {
        self.render(Input::from_text(text), annotations)
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying renderer
    pub fn renderer(&self) -> &Renderer {
        &self.inner
    }
}

// Convenience functions

/// Segment canonical text by exact offsets with default configuration
pub fn render_text(text: &str, annotations: &[Annotation]) -> Result<Output> {
    Highlighter::new()?.render_text(text, annotations)
}

/// Highlight chapter markup with default configuration
pub fn render_markup(markup: &str, annotations: &[Annotation]) -> Result<Output> {
    Highlighter::with_source_kind(SourceKind::Markup)?.render_text(markup, annotations)
}

/// Render a file, choosing the source kind from its extension
pub fn render_file<P: AsRef<Path>>(path: P, annotations: &[Annotation]) -> Result<Output> {
    let path = path.as_ref();
    let highlighter = Highlighter::with_source_kind(source_kind_for(path))?;
    highlighter.render(Input::from_file(path), annotations)
}

/// Source kind suggested by a file extension
pub fn source_kind_for(path: &Path) -> SourceKind {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("html" | "htm" | "xhtml" | "xml") => SourceKind::Markup,
        _ => SourceKind::Paragraphs,
    }
}

/// Parse annotations from JSON
///
/// Accepts a bare array or an object with an `annotations` array. A missing
/// extraction text defaults to the entity name.
#[cfg(feature = "serde")]
pub fn parse_annotations(json: &str) -> Result<Vec<Annotation>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum AnnotationFile {
        List(Vec<Annotation>),
        Wrapped { annotations: Vec<Annotation> },
    }

    let file: AnnotationFile = serde_json::from_str(json)?;
    let mut annotations = match file {
        AnnotationFile::List(annotations) | AnnotationFile::Wrapped { annotations } => annotations,
    };
    for annotation in &mut annotations {
        if annotation.extraction_text.is_empty() {
            annotation.extraction_text = annotation.entity_name.clone();
        }
    }
    Ok(annotations)
}

/// Load annotations from a JSON file
#[cfg(feature = "serde")]
pub fn load_annotations<P: AsRef<Path>>(path: P) -> Result<Vec<Annotation>> {
    let json = std::fs::read_to_string(path)?;
    parse_annotations(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_for_extension() {
        assert_eq!(source_kind_for(Path::new("ch1.XHTML")), SourceKind::Markup);
        assert_eq!(source_kind_for(Path::new("ch1.txt")), SourceKind::Paragraphs);
        assert_eq!(source_kind_for(Path::new("notes")), SourceKind::Paragraphs);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parse_annotations_shapes() {
        let list = r#"[{"entity_name":"Bob","entity_type":"character","char_offset_start":0,"char_offset_end":3}]"#;
        let wrapped = format!(r#"{{"chapter": 1, "annotations": {list}}}"#);

        let from_list = parse_annotations(list).unwrap();
        let from_wrapped = parse_annotations(&wrapped).unwrap();
        assert_eq!(from_list, from_wrapped);
        assert_eq!(from_list[0].confidence, 1.0);
        assert_eq!(from_list[0].mention_type, MentionType::DirectName);
        assert_eq!(from_list[0].extraction_text, "Bob");
        assert!(parse_annotations("{\"nope\": true}").is_err());
    }
}
