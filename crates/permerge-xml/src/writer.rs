//! Deterministic, indented serialization of element trees.
//!
//! Output layout follows the metadata file convention: an XML declaration,
//! one element per line, leaf text inline, fixed-width space indentation.

use permerge_types::{Document, Element};
use quick_xml::escape::{escape, partial_escape};

/// The declaration written at the top of every document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Output layout options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Whether to emit [`XML_DECLARATION`].
    pub declaration: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            declaration: true,
        }
    }
}

/// Serialize a whole document, ending with a newline.
pub fn write_document(doc: &Document, options: &WriteOptions) -> String {
    write_element(&doc.root, options)
}

/// Serialize `root` and its subtree, ending with a newline.
pub fn write_element(root: &Element, options: &WriteOptions) -> String {
    let mut out = String::new();
    if options.declaration {
        out.push_str(XML_DECLARATION);
        out.push('\n');
    }
    write_node(&mut out, root, 0, options.indent);
    out
}

fn write_node(out: &mut String, element: &Element, depth: usize, indent: usize) {
    out.extend(std::iter::repeat(' ').take(depth * indent));
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }

    if element.children.is_empty() {
        match &element.text {
            Some(text) => {
                out.push('>');
                out.push_str(&partial_escape(text.as_str()));
                close(out, &element.tag);
            }
            None => out.push_str("/>"),
        }
        out.push('\n');
        return;
    }

    out.push_str(">\n");
    for child in &element.children {
        write_node(out, child, depth + 1, indent);
    }
    out.extend(std::iter::repeat(' ').take(depth * indent));
    close(out, &element.tag);
    out.push('\n');
}

fn close(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_element;

    fn sample() -> Element {
        Element::new("PermissionSet")
            .with_child(Element::leaf("label", "R&D <core>"))
            .with_child(
                Element::new("objectPermissions")
                    .with_child(Element::leaf("allowRead", "true"))
                    .with_child(Element::leaf("object", "Account")),
            )
            .with_child(Element::new("description"))
    }

    #[test]
    fn writes_indented_layout() {
        let xml = write_element(&sample(), &WriteOptions::default());
        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<PermissionSet>
    <label>R&amp;D &lt;core&gt;</label>
    <objectPermissions>
        <allowRead>true</allowRead>
        <object>Account</object>
    </objectPermissions>
    <description/>
</PermissionSet>
";
        assert_eq!(xml, expected);
    }

    #[test]
    fn custom_indent_without_declaration() {
        let options = WriteOptions {
            indent: 2,
            declaration: false,
        };
        let root = Element::new("a").with_child(Element::leaf("b", "c"));
        assert_eq!(write_element(&root, &options), "<a>\n  <b>c</b>\n</a>\n");
    }

    #[test]
    fn escapes_attribute_quotes() {
        let root = Element::new("a").with_attribute("title", "say \"hi\"");
        let xml = write_element(&root, &WriteOptions { declaration: false, ..Default::default() });
        assert_eq!(xml, "<a title=\"say &quot;hi&quot;\"/>\n");
    }

    #[test]
    fn output_reparses_to_same_tree() {
        let original = sample();
        let xml = write_element(&original, &WriteOptions::default());
        assert_eq!(parse_element(&xml).unwrap(), original);
    }
}
