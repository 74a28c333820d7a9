//! The merge engine: folds a Profile into a PermissionSet.
//!
//! One step per section tag of the source, in first-seen order:
//!
//! - unknown sections are skipped (and dropped from the target),
//! - keyed sections are merged entry by entry: new keys are appended, known
//!   keys are reconciled field by field and replaced in place,
//! - singular sections are added when missing and replaced wholesale when
//!   their concatenated field text differs.
//!
//! Afterwards leftover unknown target sections are pruned and namespaces are
//! stripped. Every decision is recorded in the returned [`ActionLog`].

use permerge_types::{Document, DocumentKind, Element, FieldMap};
use tracing::{debug, info, warn};

use crate::action::{Action, ActionLog, Outcome};
use crate::config::{MergeConfig, MergeOptions};
use crate::error::MergeResult;
use crate::keyer::{identity_key, index_entries};
use crate::reconcile::reconcile;
use crate::schema::{Schema, SectionKind};
use crate::sections::{first_position, group_sections, remove_all};

/// Merges Profile documents into PermissionSet documents.
///
/// The engine holds only immutable configuration; every run works on the
/// trees it is given.
#[derive(Clone, Debug, Default)]
pub struct MergeEngine {
    schema: Schema,
    options: MergeOptions,
}

impl MergeEngine {
    /// An engine with default options.
    pub fn new(schema: Schema) -> Self {
        Self::with_options(schema, MergeOptions::default())
    }

    pub fn with_options(schema: Schema, options: MergeOptions) -> Self {
        Self { schema, options }
    }

    /// Build an engine from a loaded configuration.
    pub fn from_config(config: &MergeConfig) -> MergeResult<Self> {
        Ok(Self::with_options(config.schema.to_schema()?, config.options.clone()))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Check document kinds, then merge `source` into a copy of `target`.
    pub fn merge_documents(
        &self,
        source: &Document,
        target: &Document,
    ) -> MergeResult<(Document, ActionLog)> {
        source.expect_kind(DocumentKind::Profile)?;
        target.expect_kind(DocumentKind::PermissionSet)?;
        let mut merged = target.clone();
        let log = self.merge(source, &mut merged);
        Ok((merged, log))
    }

    /// Merge `source` into `target` in place.
    ///
    /// Document kinds are not checked; see [`MergeEngine::merge_documents`].
    pub fn merge(&self, source: &Document, target: &mut Document) -> ActionLog {
        let mut log = ActionLog::new();
        let sections = group_sections(&source.root);

        for (section, entries) in sections.iter() {
            let outcome = match self.schema.classify(section) {
                SectionKind::Unknown => {
                    let removed_from_target = if self.options.prune_unknown_target_sections {
                        remove_all(&mut target.root, section)
                    } else {
                        0
                    };
                    Outcome::SkipUnknown { removed_from_target }
                }
                SectionKind::Keyed { .. } => self.merge_keyed(section, entries, &mut target.root),
                SectionKind::Singular => merge_singular(section, entries, &mut target.root),
            };
            debug!(section, ?outcome, "section merged");
            log.push(Action::new(section, outcome));
        }

        if self.options.prune_unknown_target_sections {
            self.prune_unknown(&mut target.root, &mut log);
        }
        if self.options.strip_namespaces {
            target.strip_namespaces();
        }

        info!(
            sections = log.len(),
            added = log.total_added(),
            updated = log.total_updated(),
            "merge complete"
        );
        log
    }

    fn merge_keyed(&self, section: &str, entries: &[&Element], root: &mut Element) -> Outcome {
        let mut index = index_entries(&self.schema, root, section);
        let (mut added, mut updated, mut keyless) = (0, 0, 0);

        for entry in entries {
            let Some(key) = identity_key(&self.schema, entry) else {
                debug!(section, "source entry has no identity field; not merged");
                keyless += 1;
                continue;
            };
            match index.get(&key).copied() {
                None => {
                    root.push((*entry).clone());
                    debug!(%key, "entry added");
                    // A repeated key later in the source merges into this copy.
                    index.insert(key, root.children.len() - 1);
                    added += 1;
                }
                Some(pos) => {
                    let merged = reconcile(
                        &FieldMap::from_element(&root.children[pos]),
                        &FieldMap::from_element(entry),
                    );
                    root.children[pos] = merged.to_element(section);
                    debug!(%key, pos, "entry reconciled in place");
                    updated += 1;
                }
            }
        }

        Outcome::Update {
            added,
            updated,
            keyless,
        }
    }

    /// Drop unknown sections that only the target had.
    fn prune_unknown(&self, root: &mut Element, log: &mut ActionLog) {
        let unknown: Vec<String> = group_sections(root)
            .tags()
            .filter(|tag| !self.schema.is_valid(tag))
            .map(str::to_string)
            .collect();
        for section in unknown {
            let removed_from_target = remove_all(root, &section);
            warn!(section = %section, removed_from_target, "pruned unknown section from target");
            log.push(Action::new(section, Outcome::SkipUnknown { removed_from_target }));
        }
    }
}

/// Only the first instance on each side takes part. The comparison is on
/// [`Element::concatenated_child_text`], so it ignores field names.
fn merge_singular(section: &str, entries: &[&Element], root: &mut Element) -> Outcome {
    let Some(source) = entries.first() else {
        return Outcome::SkipIdentical;
    };
    match first_position(root, section) {
        None => {
            root.push((*source).clone());
            Outcome::Add
        }
        Some(pos)
            if root.children[pos].concatenated_child_text()
                != source.concatenated_child_text() =>
        {
            root.children.remove(pos);
            root.push((*source).clone());
            Outcome::Replace
        }
        Some(_) => Outcome::SkipIdentical,
    }
}
