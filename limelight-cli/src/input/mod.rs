//! Input handling module

pub mod file_reader;
pub mod glob_resolver;

pub use file_reader::{sidecar_path, FileReader};
pub use glob_resolver::resolve_patterns;
