//! HTML Serialization (innerHTML/outerHTML)
//!
//! Text and attribute values are always escaped on output; the tree never
//! stores pre-rendered markup.

use crate::{DomTree, NodeData, NodeId};

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// HTML serializer
#[derive(Debug, Clone)]
pub struct HtmlSerializer {
    /// Whether to format output with indentation
    pub pretty_print: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self {
            pretty_print: false,
            indent: "  ".to_string(),
        }
    }
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty_print: true,
            ..Self::default()
        }
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(tree, node_id, &mut output, 0);
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output, 0);
        output
    }

    fn newline(&self, output: &mut String, depth: usize) {
        if self.pretty_print && !output.is_empty() {
            output.push('\n');
            for _ in 0..depth {
                output.push_str(&self.indent);
            }
        }
    }

    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String, depth: usize) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => self.serialize_children(tree, node_id, output, depth),
            NodeData::Element(elem) => {
                self.newline(output, depth);
                output.push('<');
                output.push_str(&elem.tag);

                if let Some(id) = &elem.id {
                    push_attribute(output, "id", id);
                }
                if !elem.classes.is_empty() {
                    push_attribute(output, "class", &elem.classes.value());
                }
                if !elem.style.is_empty() {
                    push_attribute(output, "style", &elem.style.css_text());
                }
                for attr in elem.attrs.iter() {
                    push_attribute(output, &attr.name, &attr.value);
                }

                if VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                    output.push_str(" />");
                    return;
                }
                output.push('>');
                self.serialize_children(tree, node_id, output, depth + 1);

                let has_element_child = tree.children(node_id).any(|(_, c)| c.is_element());
                if has_element_child {
                    self.newline(output, depth);
                }
                output.push_str("</");
                output.push_str(&elem.tag);
                output.push('>');
            }
            NodeData::Text(text) => escape_text(&text.content, output),
            NodeData::Comment(text) => {
                output.push_str("<!--");
                // "--" would end the comment early
                output.push_str(&text.replace("--", "- -"));
                output.push_str("-->");
            }
        }
    }

    fn serialize_children(&self, tree: &DomTree, parent_id: NodeId, output: &mut String, depth: usize) {
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, output, depth);
        }
    }
}

fn push_attribute(output: &mut String, name: &str, value: &str) {
    output.push(' ');
    output.push_str(name);
    if !value.is_empty() {
        output.push_str("=\"");
        escape_attribute(value, output);
        output.push('"');
    }
}

/// Escape text content for HTML
pub fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
pub fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.get_mut(div)
            .and_then(|n| n.as_element_mut())
            .unwrap()
            .set_attribute("title", "\"><script>")
            .unwrap();
        let text = tree.create_text("<img src=x onerror=alert(1)> & co");
        tree.append_child(div, text).unwrap();

        assert_eq!(
            HtmlSerializer::new().serialize_outer(&tree, div),
            "<div title=\"&quot;&gt;&lt;script&gt;\">&lt;img src=x onerror=alert(1)&gt; &amp; co</div>"
        );
    }

    #[test]
    fn test_structural_attributes_first_and_void() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        {
            let elem = tree.get_mut(input).and_then(|n| n.as_element_mut()).unwrap();
            elem.set_attribute("type", "text").unwrap();
            elem.set_attribute("class", "field").unwrap();
            elem.set_attribute("id", "q").unwrap();
            elem.set_disabled(true).unwrap();
        }
        assert_eq!(
            HtmlSerializer::new().serialize_outer(&tree, input),
            "<input id=\"q\" class=\"field\" type=\"text\" disabled />"
        );
    }

    #[test]
    fn test_inner_html_of_document() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let t = tree.create_text("hi");
        tree.append_child(tree.root(), p).unwrap();
        tree.append_child(p, t).unwrap();
        assert_eq!(HtmlSerializer::new().serialize_inner(&tree, tree.root()), "<p>hi</p>");
    }

    #[test]
    fn test_pretty_print_nests() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let li = tree.create_element("li");
        let t = tree.create_text("one");
        tree.append_child(ul, li).unwrap();
        tree.append_child(li, t).unwrap();
        assert_eq!(
            HtmlSerializer::pretty().serialize_outer(&tree, ul),
            "<ul>\n  <li>one</li>\n</ul>"
        );
    }
}
