//! Render orchestration
//!
//! A [`Renderer`] ties the pieces together for each source kind:
//!
//! - text: filter, then segment by exact offsets
//! - paragraphs: filter, split, segment each paragraph and label its kind
//! - markup: sanitize, parse, label blocks, locate by text, inject
//!
//! Renders never fail. Annotations that cannot be placed are counted in
//! [`RenderStats::annotations_dropped`].

use crate::classify::{BlockClassifier, BLOCK_KIND_ATTR};
use crate::config::{EngineConfig, RuleSource};
use crate::error::{EngineError, Result};
use crate::inject::{inject, HighlightOptions};
use crate::markup::{parse_markup, Element, MarkupTree};
use crate::sanitize::{AllowListSanitizer, Sanitizer};
use crate::walker::TextLeaves;
use limelight_core::{
    locate_with, normalize, segment, segment_paragraphs, split_paragraphs, Annotation, Paragraph,
    Segment,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Counters for one render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Annotations passed in
    pub annotations_total: usize,
    /// Annotations hidden by the filter
    pub annotations_filtered: usize,
    /// Visible annotations that produced no highlight
    pub annotations_dropped: usize,
    /// Highlights in the output
    pub highlights: usize,
    /// Wall time of the render
    pub processing_time: Duration,
}

impl RenderStats {
    fn finish(total: usize, visible: usize, highlights: usize, started: Instant) -> Self {
        Self {
            annotations_total: total,
            annotations_filtered: total - visible,
            annotations_dropped: visible.saturating_sub(highlights),
            highlights,
            processing_time: started.elapsed(),
        }
    }
}

/// Segments of a whole chapter text
#[derive(Debug, Clone)]
pub struct RenderedText<'t, 'a> {
    /// Segments covering the text
    pub segments: Vec<Segment<'t, 'a>>,
    /// Render counters
    pub stats: RenderStats,
}

impl RenderedText<'_, '_> {
    /// Segments as a markup fragment
    pub fn to_tree(&self, options: &HighlightOptions) -> MarkupTree {
        MarkupTree::from_segments(&self.segments, options)
    }
}

/// One paragraph with its kind and segments
#[derive(Debug, Clone)]
pub struct RenderedParagraph<'t, 'a> {
    /// The paragraph
    pub paragraph: Paragraph<'t>,
    /// Block kind label
    pub block_kind: String,
    /// Segments covering the paragraph
    pub segments: Vec<Segment<'t, 'a>>,
}

/// Paragraph-mode output
#[derive(Debug, Clone)]
pub struct RenderedParagraphs<'t, 'a> {
    /// Paragraphs in order
    pub paragraphs: Vec<RenderedParagraph<'t, 'a>>,
    /// Render counters
    pub stats: RenderStats,
}

impl RenderedParagraphs<'_, '_> {
    /// Paragraphs as `<p>` elements labelled with their block kind
    pub fn to_tree(&self, options: &HighlightOptions) -> MarkupTree {
        let mut tree = MarkupTree::new();
        let root = tree.root();
        for rendered in &self.paragraphs {
            let p = tree.append_element(
                root,
                Element::new("p").with_attr(BLOCK_KIND_ATTR, rendered.block_kind.clone()),
            );
            tree.append_segments(p, &rendered.segments, options);
        }
        tree
    }
}

/// Markup-mode output
#[derive(Debug, Clone)]
pub struct RenderedMarkup {
    /// The highlighted tree
    pub tree: MarkupTree,
    /// Render counters
    pub stats: RenderStats,
}

impl RenderedMarkup {
    /// Serialized highlighted markup
    pub fn to_markup(&self) -> String {
        self.tree.to_markup()
    }
}

/// Annotation highlighting for chapter text and markup
#[derive(Clone)]
pub struct Renderer {
    config: EngineConfig,
    sanitizer: Arc<dyn Sanitizer>,
    classifier: Option<Arc<BlockClassifier>>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field(
                "classifier",
                &self.classifier.as_ref().map(|c| c.name().to_string()),
            )
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Renderer with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Renderer with `config`
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        RendererBuilder::new().config(config).build()
    }

    /// Start building a renderer
    pub fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    /// The active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The block classifier, if classification is enabled
    pub fn classifier(&self) -> Option<&BlockClassifier> {
        self.classifier.as_deref()
    }

    fn visible<'a>(&self, annotations: &'a [Annotation]) -> Vec<&'a Annotation> {
        annotations
            .iter()
            .filter(|annotation| self.config.filter.allows(annotation))
            .collect()
    }

    fn block_kind(&self, text: &str) -> String {
        match &self.classifier {
            Some(classifier) => classifier.classify(text).to_string(),
            None => "narrative".to_string(),
        }
    }

    /// Segment canonical chapter text by exact offsets
    pub fn render_text<'t, 'a>(
        &self,
        text: &'t str,
        annotations: &'a [Annotation],
    ) -> RenderedText<'t, 'a> {
        let started = Instant::now();
        let visible = self.visible(annotations);
        let segments = segment(text, visible.iter().copied());
        let highlights = segments.iter().filter(|s| s.is_annotated()).count();

        let stats = RenderStats::finish(annotations.len(), visible.len(), highlights, started);
        debug!("rendered text: {:?}", stats);
        RenderedText { segments, stats }
    }

    /// Segment paragraphs of canonical chapter text
    pub fn render_paragraphs<'t, 'a>(
        &self,
        paragraphs: &[Paragraph<'t>],
        annotations: &'a [Annotation],
    ) -> RenderedParagraphs<'t, 'a> {
        let started = Instant::now();
        let visible = self.visible(annotations);

        let paragraphs: Vec<RenderedParagraph<'t, 'a>> =
            segment_paragraphs(paragraphs, visible.iter().copied())
                .into_iter()
                .map(|p| RenderedParagraph {
                    block_kind: self.block_kind(p.paragraph.text),
                    paragraph: p.paragraph,
                    segments: p.segments,
                })
                .collect();
        let highlights = paragraphs
            .iter()
            .map(|p| p.segments.iter().filter(|s| s.is_annotated()).count())
            .sum();

        let stats = RenderStats::finish(annotations.len(), visible.len(), highlights, started);
        debug!(
            "rendered {} paragraph(s): {:?}",
            paragraphs.len(),
            stats
        );
        RenderedParagraphs { paragraphs, stats }
    }

    /// Split chapter text on line breaks and render the paragraphs
    pub fn render_chapter<'t, 'a>(
        &self,
        text: &'t str,
        annotations: &'a [Annotation],
    ) -> RenderedParagraphs<'t, 'a> {
        self.render_paragraphs(&split_paragraphs(text), annotations)
    }

    /// Sanitize and parse raw markup into a pristine tree with block labels
    ///
    /// Keep the result to re-render with other filters without parsing
    /// again.
    pub fn prepare(&self, raw: &str) -> MarkupTree {
        let clean = self.sanitizer.sanitize(raw, &self.config.allow_list);
        let mut tree = parse_markup(&clean);
        if let Some(classifier) = &self.classifier {
            let special = classifier.annotate_blocks(&mut tree);
            debug!("{} block(s) labelled as non-narrative", special);
        }
        tree
    }

    /// Highlight a pristine tree; `pristine` itself is not modified
    pub fn highlight(&self, pristine: &MarkupTree, annotations: &[Annotation]) -> RenderedMarkup {
        let started = Instant::now();
        let visible = self.visible(annotations);

        let leaves = TextLeaves::collect(pristine);
        let normalized = normalize(&leaves.full_text);
        let matches = locate_with(&normalized, visible.iter().copied(), &self.config.locate);
        let (tree, report) = inject(pristine, &matches, &self.config.highlight);
        debug!(
            "located {} of {} visible annotation(s), injected {}, skipped {}",
            matches.len(),
            visible.len(),
            report.applied,
            report.skipped
        );

        RenderedMarkup {
            tree,
            stats: RenderStats::finish(annotations.len(), visible.len(), report.applied, started),
        }
    }

    /// Sanitize, parse and highlight raw chapter markup
    pub fn render_markup(&self, raw: &str, annotations: &[Annotation]) -> RenderedMarkup {
        let pristine = self.prepare(raw);
        self.highlight(&pristine, annotations)
    }
}

/// Builder for [`Renderer`]
pub struct RendererBuilder {
    config: EngineConfig,
    sanitizer: Option<Arc<dyn Sanitizer>>,
    classifier: Option<BlockClassifier>,
}

impl Default for RendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererBuilder {
    /// Builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            sanitizer: None,
            classifier: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom sanitizer
    pub fn sanitizer(mut self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    /// Use an already compiled classifier, overriding the configured rules
    pub fn classifier(mut self, classifier: BlockClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the block rule source
    pub fn rules(mut self, rules: RuleSource) -> Self {
        self.config.rules = rules;
        self
    }

    /// Build the renderer
    pub fn build(self) -> Result<Renderer> {
        self.config.validate().map_err(EngineError::ConfigError)?;

        let classifier = match self.classifier {
            Some(classifier) => Some(classifier),
            None => match &self.config.rules {
                RuleSource::Disabled => None,
                RuleSource::Embedded(name) => Some(BlockClassifier::embedded(name)?),
                RuleSource::File(path) => Some(BlockClassifier::from_file(path)?),
            },
        };

        Ok(Renderer {
            config: self.config,
            sanitizer: self
                .sanitizer
                .unwrap_or_else(|| Arc::new(AllowListSanitizer) as Arc<dyn Sanitizer>),
            classifier: classifier.map(Arc::new),
        })
    }
}
