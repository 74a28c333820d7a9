//! Ordered flat field maps.
//!
//! An entry of a repeated section is a flat list of scalar fields. Merging two
//! entries works on a [`FieldMap`]: field name to trimmed text, keeping the
//! order in which names were first inserted so rebuilt entries read the same
//! way as the originals.

use serde::{Deserialize, Serialize};

use crate::element::Element;

/// Insertion-ordered mapping from field name to text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten the direct children of `element`.
    ///
    /// Keys are local names, values are trimmed text (empty when absent). A
    /// repeated child name keeps its first position and its last value.
    pub fn from_element(element: &Element) -> Self {
        let mut map = Self::new();
        for child in &element.children {
            map.insert(child.local_name(), child.trimmed_text());
        }
        map
    }

    /// Build a fresh entry element named `tag` with one leaf per field.
    pub fn to_element(&self, tag: impl Into<String>) -> Element {
        let mut element = Element::new(tag);
        for (name, value) in &self.entries {
            element.push(Element::leaf(name.clone(), value.clone()));
        }
        element
    }

    /// Insert or overwrite. Overwriting keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
