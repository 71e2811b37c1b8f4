//! TOML schema for block rule sets

use serde::{Deserialize, Serialize};

/// Root of a rule set file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// Name and labels of the set
    pub metadata: Metadata,
    /// Rules in priority order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Rule set metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Rule set name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Label for blocks no rule matches
    #[serde(default = "default_generic_label")]
    pub generic_label: String,
}

/// One labelled pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Block kind assigned on match
    pub label: String,
    /// Regex tried against the trimmed block text
    pub pattern: String,
    /// What the rule is for
    #[serde(default)]
    pub description: String,
}

fn default_generic_label() -> String {
    "narrative".to_string()
}

impl RuleSetConfig {
    /// Check the parts patterns cannot check
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.metadata.name.trim().is_empty() {
            return Err("Rule set name is empty".to_string());
        }
        if self.metadata.generic_label.trim().is_empty() {
            return Err("Generic label is empty".to_string());
        }
        if let Some(rule) = self.rules.iter().find(|rule| rule.label.trim().is_empty()) {
            return Err(format!("Rule with pattern '{}' has no label", rule.pattern));
        }
        Ok(())
    }
}
