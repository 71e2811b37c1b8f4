//! Markup output formatter

use super::OutputFormatter;
use anyhow::Result;
use limelight_api::Output;
use std::io::Write;
use std::path::Path;

/// Markup formatter - writes the highlighted markup of each file
pub struct HtmlFormatter<W: Write> {
    writer: W,
    include_metadata: bool,
}

impl<W: Write> HtmlFormatter<W> {
    /// Create a new markup formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            include_metadata: false,
        }
    }

    /// Precede each file with a comment summarizing the render
    pub fn include_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }
}

impl<W: Write + Send + Sync> OutputFormatter for HtmlFormatter<W> {
    fn format_output(&mut self, source: &Path, output: &Output) -> Result<()> {
        if self.include_metadata {
            let meta = &output.metadata;
            // "--" may not appear inside a comment
            let source = source.display().to_string().replace("--", "-\u{2010}");
            writeln!(
                self.writer,
                "<!-- {source}: {} highlights, {} filtered, {} dropped ({}) -->",
                meta.highlights, meta.annotations_filtered, meta.annotations_dropped, meta.source_kind
            )?;
        }
        writeln!(self.writer, "{}", output.html)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
