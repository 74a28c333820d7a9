//! Identity keys for entries of keyed sections.

use std::collections::HashMap;
use std::fmt;

use permerge_types::Element;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schema::Schema;

/// `(section, identity field text)`: two entries with equal keys denote the
/// same permission, object, record type, and so on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityKey {
    pub section: String,
    pub value: String,
}

impl IdentityKey {
    pub fn new(section: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.section, self.value)
    }
}

/// Extract the identity key of `entry`.
///
/// Returns `None` if the entry's section is not keyed or the entry has no
/// direct child named after the identity field. An identity field without
/// text yields an empty (but valid) key.
pub fn identity_key(schema: &Schema, entry: &Element) -> Option<IdentityKey> {
    let section = entry.local_name();
    let field = schema.identity_field(section)?;
    let child = entry.child(field)?;
    Some(IdentityKey::new(section, child.trimmed_text()))
}

/// Index the top-level entries of `section` under `root` by identity key.
///
/// Values are positions in `root.children`. On a duplicate key the later
/// entry wins. Entries without a key are left out.
pub fn index_entries(
    schema: &Schema,
    root: &Element,
    section: &str,
) -> HashMap<IdentityKey, usize> {
    let mut index = HashMap::new();
    for (pos, child) in root.children.iter().enumerate() {
        if child.local_name() != section {
            continue;
        }
        match identity_key(schema, child) {
            Some(key) => {
                if let Some(previous) = index.insert(key, pos) {
                    debug!(section, previous, pos, "duplicate identity key; later entry wins");
                }
            }
            None => debug!(section, pos, "entry without identity field left unindexed"),
        }
    }
    index
}
