//! File reading utilities

use anyhow::{Context, Result};
use limelight_api::Annotation;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix of annotation files living next to their chapter
pub const SIDECAR_SUFFIX: &str = ".annotations.json";

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Read an annotation file
    pub fn read_annotations(path: &Path) -> Result<Vec<Annotation>> {
        let json = Self::read_text(path)?;
        let annotations = limelight_api::parse_annotations(&json)
            .with_context(|| format!("Invalid annotation file: {}", path.display()))?;
        log::debug!("{} annotations from {}", annotations.len(), path.display());
        Ok(annotations)
    }
}

/// Annotation sidecar of a chapter file: `ch1.xhtml` -> `ch1.annotations.json`
pub fn sidecar_path(chapter: &Path) -> PathBuf {
    let stem = chapter
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    chapter.with_file_name(format!("{stem}{SIDECAR_SUFFIX}"))
}

/// Whether `path` looks like an annotation sidecar
pub fn is_sidecar(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(SIDECAR_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_success() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("ch1.txt");

        let content = "Kael raised his staff.\n“Again,” said Mira.";
        fs::write(&file_path, content).unwrap();

        assert_eq!(FileReader::read_text(&file_path).unwrap(), content);
    }

    #[test]
    fn test_read_text_nonexistent_file() {
        let err = FileReader::read_text(Path::new("/nonexistent/ch1.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_read_annotations() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ch1.annotations.json");
        fs::write(
            &path,
            r#"{"annotations": [{"entity_name": "Mira", "entity_type": "character",
                "char_offset_start": 0, "char_offset_end": 4}]}"#,
        )
        .unwrap();

        let annotations = FileReader::read_annotations(&path).unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].extraction_text, "Mira");

        fs::write(&path, "not json").unwrap();
        let err = FileReader::read_annotations(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid annotation file"));
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("book/ch1.xhtml")),
            Path::new("book/ch1.annotations.json")
        );
        assert_eq!(
            sidecar_path(Path::new("ch1")),
            Path::new("ch1.annotations.json")
        );
        assert!(is_sidecar(Path::new("book/ch1.annotations.json")));
        assert!(!is_sidecar(Path::new("book/ch1.json")));
    }
}
