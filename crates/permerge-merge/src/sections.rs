//! Grouping of a document's top-level children into sections.

use std::collections::HashMap;

use permerge_types::Element;

/// Top-level children of a root element grouped by local tag name.
///
/// Groups appear in the order their tag was first seen; elements inside a
/// group keep document order. Repeated tags that are not adjacent still land
/// in the same group.
#[derive(Debug, Default)]
pub struct Sections<'a> {
    groups: Vec<(&'a str, Vec<&'a Element>)>,
    by_tag: HashMap<&'a str, usize>,
}

impl<'a> Sections<'a> {
    pub fn group(root: &'a Element) -> Self {
        let mut sections = Self::default();
        for child in &root.children {
            let tag = child.local_name();
            match sections.by_tag.get(tag) {
                Some(&i) => sections.groups[i].1.push(child),
                None => {
                    sections.by_tag.insert(tag, sections.groups.len());
                    sections.groups.push((tag, vec![child]));
                }
            }
        }
        sections
    }

    /// Elements of one section, if present.
    pub fn get(&self, tag: &str) -> Option<&[&'a Element]> {
        self.by_tag.get(tag).map(|&i| self.groups[i].1.as_slice())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Section tags in first-seen order.
    pub fn tags(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.iter().map(|(tag, _)| *tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a Element])> + '_ {
        self.groups.iter().map(|(tag, elems)| (*tag, elems.as_slice()))
    }

    /// Number of distinct section tags.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group the top-level children of `root`; see [`Sections`].
pub fn group_sections(root: &Element) -> Sections<'_> {
    Sections::group(root)
}

/// Position of the first top-level child with local name `tag`.
pub(crate) fn first_position(root: &Element, tag: &str) -> Option<usize> {
    root.children.iter().position(|c| c.local_name() == tag)
}

/// Remove every top-level child with local name `tag`; returns how many.
pub(crate) fn remove_all(root: &mut Element, tag: &str) -> usize {
    let before = root.children.len();
    root.children.retain(|c| c.local_name() != tag);
    before - root.children.len()
}
