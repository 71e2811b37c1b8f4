//! Block classification
//!
//! Labels paragraphs (or block elements) with a kind, such as a game-system
//! notification or a status window, so renderers can style them apart from
//! narrative prose. Rules are ordered regexes loaded from TOML; the first
//! rule matching the block's trimmed text wins.

pub mod config;
mod loader;

pub use config::{Metadata, RuleConfig, RuleSetConfig};
pub use loader::{get_rule_set, list_rule_sets};

use crate::error::{EngineError, Result};
use crate::markup::{MarkupTree, NodeId};
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// Elements whose text is classified in markup mode
pub const BLOCK_ELEMENTS: &[&str] = &["p", "div", "blockquote", "li"];

/// Attribute carrying the label in markup mode
pub const BLOCK_KIND_ATTR: &str = "data-block-kind";

/// A compiled rule
#[derive(Debug, Clone)]
pub struct BlockRule {
    label: String,
    regex: Regex,
}

impl BlockRule {
    /// Compile a rule
    pub fn new(label: impl Into<String>, pattern: &str) -> Result<Self> {
        let label = label.into();
        let regex = Regex::new(pattern).map_err(|e| EngineError::InvalidRule {
            label: label.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { label, regex })
    }

    /// The label this rule assigns
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether this rule matches `text`
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Ordered block rules with a fallback label
#[derive(Debug, Clone)]
pub struct BlockClassifier {
    name: String,
    rules: Vec<BlockRule>,
    generic_label: String,
}

impl BlockClassifier {
    /// A classifier without rules; everything gets `generic_label`
    pub fn generic(generic_label: impl Into<String>) -> Self {
        Self {
            name: "generic".to_string(),
            rules: Vec::new(),
            generic_label: generic_label.into(),
        }
    }

    /// Compile a parsed rule set
    pub fn from_config(config: &RuleSetConfig) -> Result<Self> {
        config.validate().map_err(EngineError::ConfigError)?;
        let rules = config
            .rules
            .iter()
            .map(|rule| BlockRule::new(rule.label.clone(), &rule.pattern))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "compiled block rule set '{}' with {} rule(s)",
            config.metadata.name,
            rules.len()
        );
        Ok(Self {
            name: config.metadata.name.clone(),
            rules,
            generic_label: config.metadata.generic_label.clone(),
        })
    }

    /// An embedded rule set by name
    pub fn embedded(name: &str) -> Result<Self> {
        let config =
            get_rule_set(name).ok_or_else(|| EngineError::UnknownRuleSet(name.to_string()))?;
        Self::from_config(config)
    }

    /// Parse and compile a rule set from TOML text
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: RuleSetConfig = toml::from_str(source)?;
        Self::from_config(&config)
    }

    /// Load a rule set file
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Rule set name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled rules in order
    pub fn rules(&self) -> &[BlockRule] {
        &self.rules
    }

    /// Label for blocks no rule matches
    pub fn generic_label(&self) -> &str {
        &self.generic_label
    }

    /// Label for a block of text
    pub fn classify(&self, text: &str) -> &str {
        let text = text.trim();
        if text.is_empty() {
            return &self.generic_label;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map_or(&self.generic_label, |rule| &rule.label)
    }

    /// Tag every block element of `tree` with its label
    ///
    /// Returns how many blocks got a non-generic label.
    pub fn annotate_blocks(&self, tree: &mut MarkupTree) -> usize {
        let blocks: Vec<NodeId> = tree
            .descendants(tree.root())
            .filter(|&id| {
                tree.element(id)
                    .is_some_and(|element| BLOCK_ELEMENTS.contains(&element.name.as_str()))
            })
            .collect();

        let mut special = 0;
        for id in blocks {
            let label = self.classify(&tree.text_content(id)).to_string();
            if label != self.generic_label {
                special += 1;
            }
            if let Some(element) = tree.element_mut(id) {
                element.set_attr(BLOCK_KIND_ATTR, label);
            }
        }
        special
    }
}
