//! Render orchestration for entity mention highlighting
//!
//! This crate turns chapter text or chapter markup plus a list of
//! annotations into highlighted output. Text sources are segmented by
//! exact offsets; markup sources are sanitized, parsed into a tree and
//! highlighted by locating each mention's text.
//!
//! # Example
//!
//! ```rust
//! use limelight_engine::{Annotation, Renderer};
//!
//! let renderer = Renderer::new()?;
//! let annotations = vec![Annotation::new("Bob", "character", 0, 3)];
//! let rendered = renderer.render_markup("<p>Bob waved.</p>", &annotations);
//! assert!(rendered.to_markup().contains("data-entity-name=\"Bob\""));
//! # Ok::<(), limelight_engine::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod classify;
pub mod config;
pub mod error;
pub mod inject;
pub mod markup;
pub mod renderer;
pub mod sanitize;
pub mod walker;

// Re-export key types
pub use classify::{BlockClassifier, BlockRule, RuleSetConfig};
pub use config::{EngineConfig, RuleSource, SourceKind};
pub use error::{EngineError, Result};
pub use inject::{inject, HighlightOptions, InjectReport};
pub use markup::{parse_markup, Element, MarkupTree, NodeData, NodeId};
pub use renderer::{
    RenderStats, RenderedMarkup, RenderedParagraph, RenderedParagraphs, RenderedText, Renderer,
    RendererBuilder,
};
pub use sanitize::{AllowList, AllowListSanitizer, Sanitizer, TrustedMarkup};
pub use walker::{TextLeaf, TextLeaves};

// Re-export from core for convenience
pub use limelight_core::{
    Annotation, AnnotationFilter, LocateOptions, Match, MentionType, Paragraph, Segment,
};
