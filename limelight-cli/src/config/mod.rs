//! Configuration module

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Rendering configuration
    #[serde(default)]
    pub render: RenderConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Annotation filter configuration
    #[serde(default)]
    pub filter: FilterConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl CliConfig {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse a configuration from TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `path` if given, the defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Rendering-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Source mode; chosen from the file extension when unset
    pub mode: Option<String>,

    /// Embedded block rule set
    pub rule_set: String,

    /// Block rule file, overriding `rule_set`
    pub rules_file: Option<PathBuf>,

    /// Classify blocks at all
    pub classify_blocks: bool,

    /// Skip sanitization of markup input
    pub trusted_markup: bool,

    /// Shortest extraction text searched in markup mode
    pub min_anchor_chars: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: None,
            rule_set: "default".to_string(),
            rules_file: None,
            classify_blocks: true,
            trusted_markup: false,
            min_anchor_chars: 2,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub default_format: String,

    /// Include render metadata in output
    pub include_metadata: bool,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "html".to_string(),
            include_metadata: true,
            pretty_json: true,
        }
    }
}

/// Which annotations are highlighted
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Mention types to show; empty shows all
    pub mention_types: Vec<String>,

    /// Entity types to show; empty shows all
    pub entity_types: Vec<String>,

    /// Hide annotations below this confidence
    pub min_confidence: f64,
}

/// Performance-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = CliConfig::from_toml("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert!(config.render.classify_blocks);
        assert_eq!(config.output.default_format, "html");
    }

    #[test]
    fn test_partial_sections() {
        let config = CliConfig::from_toml(
            r#"
[render]
mode = "markup"
rule_set = "plain"

[filter]
mention_types = ["direct_name", "alias"]
min_confidence = 0.4

[performance]
worker_threads = 2
"#,
        )
        .unwrap();
        assert_eq!(config.render.mode.as_deref(), Some("markup"));
        assert_eq!(config.render.rule_set, "plain");
        assert!(config.render.classify_blocks);
        assert_eq!(config.filter.mention_types.len(), 2);
        assert_eq!(config.filter.min_confidence, 0.4);
        assert_eq!(config.performance.worker_threads, 2);
        assert!(config.output.pretty_json);
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(CliConfig::from_toml("[theme]\ncolor = \"gold\"\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/limelight.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
