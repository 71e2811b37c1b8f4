//! File pattern resolution using glob

use super::file_reader::is_sidecar;
use crate::error::CliError;
use anyhow::{Context, Result};
use glob::glob;
use std::path::PathBuf;

/// Resolve file patterns to chapter files
///
/// Annotation sidecars matched by a broad pattern are skipped.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob(pattern).map_err(|_| CliError::InvalidPattern(pattern.clone()))?;

        for path_result in paths {
            let path =
                path_result.with_context(|| format!("Error resolving pattern: {}", pattern))?;

            if path.is_file() && !is_sidecar(&path) {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!("No files found matching the provided patterns");
    }

    files.sort();
    files.dedup();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_skips_sidecars() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ch1.xhtml"), "<p>x</p>").unwrap();
        fs::write(dir.path().join("ch1.annotations.json"), "[]").unwrap();
        fs::write(dir.path().join("ch2.txt"), "x").unwrap();

        let pattern = format!("{}/*", dir.path().display());
        let files = resolve_patterns(&[pattern.clone(), pattern]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["ch1.xhtml", "ch2.txt"]);
    }

    #[test]
    fn test_resolve_nothing_found() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.xhtml", dir.path().display());
        let err = resolve_patterns(&[pattern]).unwrap_err();
        assert!(err.to_string().contains("No files found"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = resolve_patterns(&["[invalid".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidPattern(_))
        ));
    }
}
