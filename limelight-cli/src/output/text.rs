//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use limelight_api::Output;
use limelight_engine::markup::{is_void, parse_markup, MarkupTree, NodeData, NodeId};
use limelight_engine::walker::HIGHLIGHT_MARKER_ATTR;
use std::io::Write;
use std::path::Path;

const LINE_BREAKING: &[&str] = &[
    "p", "div", "blockquote", "li", "br", "h1", "h2", "h3", "h4", "h5", "h6", "tr",
];

/// Plain text formatter - writes the text with `[[mention|entity]]` markers
pub struct TextFormatter<W: Write> {
    writer: W,
    include_metadata: bool,
    files: usize,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            include_metadata: false,
            files: 0,
        }
    }

    /// Follow each file with a one-line summary
    pub fn include_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_output(&mut self, source: &Path, output: &Output) -> Result<()> {
        if self.files > 0 {
            writeln!(self.writer)?;
        }
        self.files += 1;

        let tree = parse_markup(&output.html);
        let mut text = String::new();
        write_marked(&tree, tree.root(), &mut text);
        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            writeln!(self.writer, "{line}")?;
        }

        if self.include_metadata {
            let meta = &output.metadata;
            writeln!(
                self.writer,
                "# {}: {} highlights, {} filtered, {} dropped",
                source.display(),
                meta.highlights,
                meta.annotations_filtered,
                meta.annotations_dropped
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Text of `id` with highlights written as `[[text|entity]]`
fn write_marked(tree: &MarkupTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match node.data() {
        NodeData::Text(text) => out.push_str(text),
        NodeData::Fragment => {
            for &child in node.children() {
                write_marked(tree, child, out);
            }
        }
        NodeData::Element(element) => {
            if let Some(entity) = element.attr(HIGHLIGHT_MARKER_ATTR) {
                out.push_str("[[");
                out.push_str(&tree.text_content(id));
                out.push('|');
                out.push_str(entity);
                out.push_str("]]");
                return;
            }
            if !is_void(&element.name) {
                for &child in node.children() {
                    write_marked(tree, child, out);
                }
            }
            if LINE_BREAKING.contains(&element.name.as_str()) {
                out.push('\n');
            }
        }
    }
}
