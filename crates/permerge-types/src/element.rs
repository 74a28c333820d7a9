use serde::{Deserialize, Serialize};

use crate::namespace::strip_namespace;

/// A node in a parsed permission document.
///
/// Children of the document root are sections; children of a section are
/// either scalar fields (leaves with `text`) or, for repeated sections, the
/// fields of one entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name, possibly namespace-qualified.
    pub tag: String,
    /// Attributes in document order (namespace declarations excluded).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    /// Scalar text content. Only leaves carry text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Child elements in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Create a leaf element holding `text`.
    pub fn leaf(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style attribute append.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child at the end.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// The tag without any namespace qualification.
    pub fn local_name(&self) -> &str {
        strip_namespace(&self.tag)
    }

    /// Text with surrounding whitespace removed; empty when absent.
    pub fn trimmed_text(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    /// First direct child whose local name is `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == name)
    }

    /// Returns `true` if this element has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenation of the trimmed text of each direct child, no separator.
    ///
    /// Field names play no part, so `a`+`b` and `ab`+`` compare equal.
    pub fn concatenated_child_text(&self) -> String {
        self.children.iter().map(Element::trimmed_text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_permission() -> Element {
        Element::new("objectPermissions")
            .with_child(Element::leaf("allowRead", " true "))
            .with_child(Element::leaf("{urn:x}object", "Account"))
    }

    #[test]
    fn leaf_has_text() {
        let leaf = Element::leaf("label", "Sales");
        assert!(leaf.is_leaf());
        assert_eq!(leaf.text.as_deref(), Some("Sales"));
    }

    #[test]
    fn trimmed_text_handles_missing_text() {
        assert_eq!(Element::new("empty").trimmed_text(), "");
        assert_eq!(Element::leaf("x", "  y \n").trimmed_text(), "y");
    }

    #[test]
    fn child_lookup_ignores_namespace() {
        let entry = object_permission();
        let object = entry.child("object").unwrap();
        assert_eq!(object.trimmed_text(), "Account");
        assert!(entry.child("field").is_none());
    }

    #[test]
    fn concatenated_text_is_trimmed_and_unseparated() {
        let entry = object_permission();
        assert_eq!(entry.concatenated_child_text(), "trueAccount");
    }

    #[test]
    fn concatenation_ignores_field_boundaries() {
        let a = Element::new("s")
            .with_child(Element::leaf("x", "ab"))
            .with_child(Element::new("y"));
        let b = Element::new("s")
            .with_child(Element::leaf("x", "a"))
            .with_child(Element::leaf("y", "b"));
        assert_eq!(a.concatenated_child_text(), b.concatenated_child_text());
    }

    #[test]
    fn serializes_without_empty_parts() {
        let json = serde_json::to_string(&Element::leaf("label", "Sales")).unwrap();
        assert_eq!(json, r#"{"tag":"label","text":"Sales"}"#);
    }
}
