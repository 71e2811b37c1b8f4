//! Markup serialization

use super::parse::is_void;
use super::tree::{MarkupTree, NodeData, NodeId};
use quick_xml::escape::{escape, partial_escape};

impl MarkupTree {
    /// Serialize the whole document
    pub fn to_markup(&self) -> String {
        self.node_markup(self.root())
    }

    /// Serialize `id` and its subtree
    ///
    /// Text is escaped for `&`, `<` and `>`; attribute values additionally
    /// for quotes. Void elements are written self-closed.
    pub fn node_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };

        match node.data() {
            NodeData::Fragment => {
                for &child in node.children() {
                    self.write_node(child, out);
                }
            }
            NodeData::Text(text) => out.push_str(&partial_escape(text.as_str())),
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value.as_str()));
                    out.push('"');
                }

                if node.children().is_empty() && is_void(&element.name) {
                    out.push_str("/>");
                    return;
                }

                out.push('>');
                for &child in node.children() {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::markup::{parse_markup, Element};

    #[test]
    fn test_round_trip_simple() {
        let source = r#"<p class="intro">Hello <em>world</em></p>"#;
        assert_eq!(parse_markup(source).to_markup(), source);
    }

    #[test]
    fn test_void_written_self_closed() {
        assert_eq!(parse_markup("<p>a<br>b</p>").to_markup(), "<p>a<br/>b</p>");
    }

    #[test]
    fn test_text_and_attributes_escaped() {
        let mut tree = parse_markup("");
        let root = tree.root();
        let span = tree.append_element(
            root,
            Element::new("span").with_attr("title", r#""><script>x</script>"#),
        );
        tree.append_text(span, "a < b & c");
        assert_eq!(
            tree.to_markup(),
            "<span title=\"&quot;&gt;&lt;script&gt;x&lt;/script&gt;\">a &lt; b &amp; c</span>"
        );
    }

    #[test]
    fn test_entities_normalized_to_chars() {
        let tree = parse_markup("<p>&ldquo;Hi&rdquo;</p>");
        assert_eq!(tree.to_markup(), "<p>\u{201C}Hi\u{201D}</p>");
    }
}
