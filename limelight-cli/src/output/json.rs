//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use limelight_api::Output;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// JSON formatter - outputs one record per source file as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    records: Vec<serde_json::Value>,
    pretty: bool,
    include_metadata: bool,
}

/// One source file and its render
#[derive(Debug, Serialize)]
struct FileRecord<'a> {
    source: String,
    #[serde(flatten)]
    output: &'a Output,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records: Vec::new(),
            pretty: true,
            include_metadata: true,
        }
    }

    /// Pretty print the array
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Keep the render metadata in each record
    pub fn include_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_output(&mut self, source: &Path, output: &Output) -> Result<()> {
        let mut record = serde_json::to_value(FileRecord {
            source: source.display().to_string(),
            output,
        })?;
        if !self.include_metadata {
            if let Some(object) = record.as_object_mut() {
                object.remove("metadata");
            }
        }
        self.records.push(record);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.records)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.records)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limelight_api::{render_text, Annotation};

    fn sample() -> Output {
        render_text("Mira smiled.", &[Annotation::new("Mira", "character", 0, 4)]).unwrap()
    }

    #[test]
    fn test_records_carry_source_and_render() {
        let mut buffer = Vec::new();
        {
            let mut formatter = JsonFormatter::new(&mut buffer);
            formatter
                .format_output(Path::new("ch1.txt"), &sample())
                .unwrap();
            formatter.finish().unwrap();
        }

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let record = &value[0];
        assert_eq!(record["source"], "ch1.txt");
        assert_eq!(record["rendered"]["mode"], "segments");
        assert_eq!(record["metadata"]["highlights"], 1);
        assert!(record["html"].as_str().unwrap().contains("data-entity-name=\"Mira\""));
    }

    #[test]
    fn test_metadata_can_be_left_out() {
        let mut buffer = Vec::new();
        {
            let mut formatter = JsonFormatter::new(&mut buffer)
                .pretty(false)
                .include_metadata(false);
            formatter.format_output(Path::new("a.txt"), &sample()).unwrap();
            formatter.format_output(Path::new("b.txt"), &sample()).unwrap();
            formatter.finish().unwrap();
        }

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert!(value[1].get("metadata").is_none());
    }
}
