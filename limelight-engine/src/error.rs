//! Engine error types

use thiserror::Error;

/// Engine-level errors
///
/// Rendering itself never fails: malformed annotations and unparseable
/// markup degrade to less highlighting. Errors come from loading
/// configuration and block rules.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// A block rule whose pattern does not compile
    #[error("invalid block rule '{label}': {reason}")]
    InvalidRule {
        /// Label of the offending rule
        label: String,
        /// Compiler message for its pattern
        reason: String,
    },

    /// No embedded rule set by that name
    #[error("unknown block rule set '{0}'")]
    UnknownRuleSet(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
