//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Invalid file pattern
    InvalidPattern(String),
    /// No annotations were given and no sidecar file exists
    MissingAnnotations(String),
    /// Configuration error
    ConfigError(String),
    /// Rendering error from the engine
    RenderError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::MissingAnnotations(path) => {
                write!(f, "No annotations for {path}: pass --annotations or add a sidecar file")
            }
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::RenderError(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<limelight_api::ApiError> for CliError {
    fn from(err: limelight_api::ApiError) -> Self {
        match err {
            limelight_api::ApiError::Config(msg) => CliError::ConfigError(msg),
            limelight_api::ApiError::Engine(e) => CliError::ConfigError(e.to_string()),
            other => CliError::RenderError(other.to_string()),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CliError::FileNotFound("ch1.xhtml".to_string()).to_string(),
            "File not found: ch1.xhtml"
        );
        assert_eq!(
            CliError::InvalidPattern("[invalid".to_string()).to_string(),
            "Invalid file pattern: [invalid"
        );
        assert_eq!(
            CliError::ConfigError("bad mode".to_string()).to_string(),
            "Configuration error: bad mode"
        );
        assert!(CliError::MissingAnnotations("ch1.txt".to_string())
            .to_string()
            .contains("sidecar"));
    }

    #[test]
    fn test_api_error_conversion() {
        let err: CliError = limelight_api::ApiError::Config("min_confidence".into()).into();
        assert!(matches!(err, CliError::ConfigError(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CliError = limelight_api::ApiError::Io(io).into();
        assert!(matches!(err, CliError::RenderError(_)));
    }

    #[test]
    fn test_cli_result_wraps_cli_error() {
        let failure: CliResult<()> = Err(CliError::RenderError("broken".into()).into());
        let err = failure.unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
        assert_eq!(err.to_string(), "Render error: broken");
    }
}
