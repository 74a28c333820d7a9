//! Target-schema tables and section classification.
//!
//! A section tag is *valid* iff it is in the allow-list. A valid section is
//! *keyed* iff it has a designated identity field; otherwise it is
//! *singular*. Everything else is *unknown* and never reaches the output.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, MergeResult};

/// Sections a permission set may contain.
pub const VALID_SECTIONS: &[&str] = &[
    "applicationVisibilities",
    "classAccesses",
    "customMetadataTypeAccesses",
    "customPermissions",
    "customSettingAccesses",
    "description",
    "fieldPermissions",
    "flowAccesses",
    "hasActivationRequired",
    "label",
    "license",
    "objectPermissions",
    "pageAccesses",
    "recordTypeVisibilities",
    "ServicePresenceStatusAccesses",
    "tabSettings",
    "userLicense",
    "userPermissions",
];

/// Repeated sections and the field that identifies each entry.
pub const IDENTITY_FIELDS: &[(&str, &str)] = &[
    ("userPermissions", "name"),
    ("fieldPermissions", "field"),
    ("objectPermissions", "object"),
    ("recordTypeVisibilities", "recordType"),
    ("applicationVisibilities", "application"),
    ("classAccesses", "apexClass"),
    ("pageAccesses", "apexPage"),
    ("tabSettings", "tab"),
    ("customPermissions", "name"),
    ("customMetadataTypeAccesses", "name"),
    ("customSettingAccesses", "name"),
    ("ServicePresenceStatusAccesses", "servicePresenceStatus"),
];

/// How the merge engine treats a section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionKind {
    /// Not part of the target schema.
    Unknown,
    /// Repeatable; each entry is identified by `identity_field`.
    Keyed { identity_field: String },
    /// One logical value.
    Singular,
}

/// The allow-list and identity-field table used for classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    valid_sections: BTreeSet<String>,
    identity_fields: BTreeMap<String, String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Schema {
    /// A schema that knows no sections.
    pub fn empty() -> Self {
        Self {
            valid_sections: BTreeSet::new(),
            identity_fields: BTreeMap::new(),
        }
    }

    /// The builtin permission set schema.
    pub fn builtin() -> Self {
        let mut schema = Self::empty();
        for section in VALID_SECTIONS {
            schema.valid_sections.insert((*section).to_string());
        }
        for (section, field) in IDENTITY_FIELDS {
            schema
                .identity_fields
                .insert((*section).to_string(), (*field).to_string());
        }
        schema
    }

    /// Allow a singular section.
    pub fn add_section(&mut self, section: &str) -> MergeResult<()> {
        check_name("section", section)?;
        self.valid_sections.insert(section.to_string());
        Ok(())
    }

    /// Allow a keyed section. The section becomes valid if it was not already.
    pub fn add_keyed_section(&mut self, section: &str, identity_field: &str) -> MergeResult<()> {
        check_name("section", section)?;
        check_name("identity field", identity_field)?;
        self.valid_sections.insert(section.to_string());
        self.identity_fields
            .insert(section.to_string(), identity_field.to_string());
        Ok(())
    }

    pub fn is_valid(&self, section: &str) -> bool {
        self.valid_sections.contains(section)
    }

    /// The identity field of a valid keyed section.
    pub fn identity_field(&self, section: &str) -> Option<&str> {
        if !self.is_valid(section) {
            return None;
        }
        self.identity_fields.get(section).map(String::as_str)
    }

    pub fn classify(&self, section: &str) -> SectionKind {
        if !self.is_valid(section) {
            return SectionKind::Unknown;
        }
        match self.identity_field(section) {
            Some(field) => SectionKind::Keyed {
                identity_field: field.to_string(),
            },
            None => SectionKind::Singular,
        }
    }

    /// Valid section names, sorted.
    pub fn valid_sections(&self) -> impl Iterator<Item = &str> {
        self.valid_sections.iter().map(String::as_str)
    }

    /// `(section, identity field)` pairs of valid keyed sections, sorted.
    pub fn keyed_sections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.identity_fields
            .iter()
            .filter(|(section, _)| self.is_valid(section))
            .map(|(s, f)| (s.as_str(), f.as_str()))
    }
}

fn check_name(what: &str, name: &str) -> MergeResult<()> {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == ':' || c == '}') {
        return Err(MergeError::InvalidSchema(format!(
            "{what} name {name:?} is not a bare element name"
        )));
    }
    Ok(())
}
