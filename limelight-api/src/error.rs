//! API error types

use limelight_engine::EngineError;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors surfaced by the public API
///
/// Rendering itself never fails; these come from configuration, rule loading
/// and reading inputs.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rule set or engine configuration could not be loaded
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Reading the source failed
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Source bytes are not UTF-8
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// Rejected configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Annotation JSON could not be decoded, or output could not be encoded
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
