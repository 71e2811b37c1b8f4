//! Engine configuration

use crate::inject::HighlightOptions;
use crate::sanitize::AllowList;
use limelight_core::{AnnotationFilter, LocateOptions};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// What kind of source a render works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceKind {
    /// Canonical chapter text; offsets are trusted
    #[default]
    Text,
    /// Canonical chapter text split into paragraphs; offsets are trusted
    Paragraphs,
    /// Sanitized chapter markup; offsets are ignored and mentions located
    Markup,
}

impl SourceKind {
    /// Every source kind
    pub const ALL: [SourceKind; 3] = [SourceKind::Text, SourceKind::Paragraphs, SourceKind::Markup];

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Text => "text",
            SourceKind::Paragraphs => "paragraphs",
            SourceKind::Markup => "markup",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(SourceKind::Text),
            "paragraphs" | "paragraph" => Ok(SourceKind::Paragraphs),
            "markup" | "html" | "xhtml" => Ok(SourceKind::Markup),
            other => Err(format!("unknown source kind '{other}'")),
        }
    }
}

/// Where block rules come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// No classification
    Disabled,
    /// An embedded rule set by name
    Embedded(String),
    /// A TOML rule set on disk
    File(PathBuf),
}

impl Default for RuleSource {
    fn default() -> Self {
        RuleSource::Embedded("default".to_string())
    }
}

/// Internal engine configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    /// Anchor search thresholds for markup mode
    pub locate: LocateOptions,
    /// Which annotations are visible
    pub filter: AnnotationFilter,
    /// Highlight wrapper shape
    pub highlight: HighlightOptions,
    /// Sanitization policy for markup mode
    pub allow_list: AllowList,
    /// Block rules
    pub rules: RuleSource,
}

impl EngineConfig {
    /// Stricter matching: longer anchors and confident annotations only
    pub fn strict() -> Self {
        Self {
            locate: LocateOptions {
                min_anchor_chars: 3,
                ..LocateOptions::default()
            },
            filter: AnnotationFilter::default().with_min_confidence(0.5),
            ..Self::default()
        }
    }

    /// Highlighting only: no block classification, text-only sanitization
    pub fn plain() -> Self {
        Self {
            allow_list: AllowList::text_only(),
            rules: RuleSource::Disabled,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.locate.anchor_prefix_chars == 0 {
            return Err("anchor_prefix_chars must be greater than 0".to_string());
        }
        if self.locate.anchor_prefix_chars > self.locate.max_anchor_chars {
            return Err(format!(
                "anchor_prefix_chars ({}) must not exceed max_anchor_chars ({})",
                self.locate.anchor_prefix_chars, self.locate.max_anchor_chars
            ));
        }
        if !(0.0..=1.0).contains(&self.filter.min_confidence) {
            return Err(format!(
                "min_confidence must be within [0, 1], got {}",
                self.filter.min_confidence
            ));
        }
        if self.highlight.tag.is_empty()
            || !self
                .highlight
                .tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(format!("invalid highlight tag '{}'", self.highlight.tag));
        }
        Ok(())
    }
}
