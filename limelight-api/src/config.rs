//! High-level configuration API

use crate::error::{ApiError, Result};
use limelight_core::MentionType;
use limelight_engine::{EngineConfig, RuleSource, SourceKind};
use std::path::PathBuf;

/// High-level configuration for highlighting
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub(crate) inner: EngineConfig,
    /// How inputs are interpreted
    pub source_kind: SourceKind,
    /// Skip sanitization for markup known to be clean
    pub trusted_markup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inner: EngineConfig::default(),
            source_kind: SourceKind::default(),
            trusted_markup: false,
        }
    }
}

impl Config {
    /// Stricter matching preset
    pub fn strict() -> Self {
        Self {
            inner: EngineConfig::strict(),
            ..Self::default()
        }
    }

    /// Highlighting without block classification
    pub fn plain() -> Self {
        Self {
            inner: EngineConfig::plain(),
            ..Self::default()
        }
    }

    /// Create a builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The engine configuration
    pub fn engine(&self) -> &EngineConfig {
        &self.inner
    }
}

/// Configuration builder
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from an engine configuration
    pub fn engine_config(mut self, config: EngineConfig) -> Self {
        self.config.inner = config;
        self
    }

    /// Set the source kind
    pub fn source_kind(mut self, kind: SourceKind) -> Self {
        self.config.source_kind = kind;
        self
    }

    /// Set the source kind by name
    pub fn source_kind_name(self, name: &str) -> Result<Self> {
        let kind = name.parse().map_err(ApiError::Config)?;
        Ok(self.source_kind(kind))
    }

    /// Only show these mention types
    pub fn mention_types<S: AsRef<str>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let kinds = names
            .into_iter()
            .map(|name| name.as_ref().parse::<MentionType>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        self.config.inner.filter = self.config.inner.filter.with_mention_types(kinds);
        Ok(self)
    }

    /// Only show these entity types
    pub fn entity_types<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.config.inner.filter = self.config.inner.filter.with_entity_types(names);
        self
    }

    /// Hide annotations below this confidence
    pub fn min_confidence(mut self, min_confidence: f64) -> Self {
        self.config.inner.filter.min_confidence = min_confidence;
        self
    }

    /// Use an embedded block rule set
    pub fn rule_set(mut self, name: impl Into<String>) -> Self {
        self.config.inner.rules = RuleSource::Embedded(name.into());
        self
    }

    /// Use a block rule file
    pub fn rules_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.inner.rules = RuleSource::File(path.into());
        self
    }

    /// Turn block classification off
    pub fn no_classification(mut self) -> Self {
        self.config.inner.rules = RuleSource::Disabled;
        self
    }

    /// Shortest extraction text searched in markup mode
    pub fn min_anchor_chars(mut self, chars: usize) -> Self {
        self.config.inner.locate.min_anchor_chars = chars;
        self
    }

    /// Long-anchor threshold and the prefix searched for such anchors
    pub fn long_anchor(mut self, max_chars: usize, prefix_chars: usize) -> Self {
        self.config.inner.locate.max_anchor_chars = max_chars;
        self.config.inner.locate.anchor_prefix_chars = prefix_chars;
        self
    }

    /// Wrapper tag and class
    pub fn highlight(mut self, tag: impl Into<String>, class: impl Into<String>) -> Self {
        self.config.inner.highlight.tag = tag.into();
        self.config.inner.highlight.class = class.into();
        self
    }

    /// Skip sanitization
    pub fn trusted_markup(mut self, trusted: bool) -> Self {
        self.config.trusted_markup = trusted;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        self.config.inner.validate().map_err(ApiError::Config)?;
        Ok(self.config)
    }
}
