//! The ordered record of decisions taken during one merge run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What happened to one section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Outcome {
    /// The section is not in the schema and was left out of the output.
    /// `removed_from_target` counts same-tag sections dropped from the target.
    SkipUnknown { removed_from_target: usize },
    /// A singular section missing from the target was copied from the source.
    Add,
    /// A keyed section was merged entry by entry.
    Update {
        added: usize,
        updated: usize,
        /// Source entries without an identity field; not merged.
        keyless: usize,
    },
    /// A singular section differed and the source value replaced it.
    Replace,
    /// A singular section was already identical in the target.
    SkipIdentical,
}

/// One log record: a section and its outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub section: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Action {
    pub fn new(section: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            section: section.into(),
            outcome,
        }
    }

    /// Returns `true` if the action changed the target document.
    pub fn is_change(&self) -> bool {
        match &self.outcome {
            Outcome::SkipUnknown { removed_from_target } => *removed_from_target > 0,
            Outcome::Add | Outcome::Replace => true,
            Outcome::Update { added, updated, .. } => added + updated > 0,
            Outcome::SkipIdentical => false,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let section = &self.section;
        match &self.outcome {
            Outcome::SkipUnknown { removed_from_target: 0 } => {
                write!(f, "SKIP section <{section}> (not valid in PermissionSet)")
            }
            Outcome::SkipUnknown { removed_from_target } => write!(
                f,
                "SKIP section <{section}> (not valid in PermissionSet, \
                 removed {removed_from_target} from target)"
            ),
            Outcome::Add => write!(f, "MERGE <{section}>: added from profile"),
            Outcome::Update { added, updated, keyless } => {
                write!(
                    f,
                    "MERGE <{section}>: added {added}, updated {updated} (less restrictive)"
                )?;
                if *keyless > 0 {
                    write!(f, ", skipped {keyless} without identity field")?;
                }
                Ok(())
            }
            Outcome::Replace => write!(f, "MERGE <{section}>: replaced with profile value"),
            Outcome::SkipIdentical => write!(f, "SKIP <{section}>: identical already present"),
        }
    }
}

/// Append-only, ordered list of [`Action`]s produced by one merge run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// The first action recorded for `section`.
    pub fn find(&self, section: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.section == section)
    }

    /// Keyed entries added across all sections.
    pub fn total_added(&self) -> usize {
        self.actions
            .iter()
            .map(|a| match a.outcome {
                Outcome::Update { added, .. } => added,
                _ => 0,
            })
            .sum()
    }

    /// Keyed entries updated across all sections.
    pub fn total_updated(&self) -> usize {
        self.actions
            .iter()
            .map(|a| match a.outcome {
                Outcome::Update { updated, .. } => updated,
                _ => 0,
            })
            .sum()
    }

    /// Number of actions that changed the target.
    pub fn changes(&self) -> usize {
        self.actions.iter().filter(|a| a.is_change()).count()
    }
}

impl<'a> IntoIterator for &'a ActionLog {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> ActionLog {
        let mut log = ActionLog::new();
        log.push(Action::new("loginIpRanges", Outcome::SkipUnknown { removed_from_target: 0 }));
        log.push(Action::new(
            "objectPermissions",
            Outcome::Update {
                added: 2,
                updated: 1,
                keyless: 0,
            },
        ));
        log.push(Action::new(
            "fieldPermissions",
            Outcome::Update {
                added: 0,
                updated: 3,
                keyless: 1,
            },
        ));
        log.push(Action::new("label", Outcome::SkipIdentical));
        log.push(Action::new("description", Outcome::Replace));
        log
    }

    #[test]
    fn display_lines() {
        let log = sample_log();
        let lines: Vec<String> = log.iter().map(ToString::to_string).collect();
        assert_eq!(lines[0], "SKIP section <loginIpRanges> (not valid in PermissionSet)");
        assert_eq!(lines[1], "MERGE <objectPermissions>: added 2, updated 1 (less restrictive)");
        assert_eq!(
            lines[2],
            "MERGE <fieldPermissions>: added 0, updated 3 (less restrictive), skipped 1 without identity field"
        );
        assert_eq!(lines[3], "SKIP <label>: identical already present");
        assert_eq!(lines[4], "MERGE <description>: replaced with profile value");
        assert_eq!(
            Action::new("userLicense", Outcome::Add).to_string(),
            "MERGE <userLicense>: added from profile"
        );
    }

    #[test]
    fn totals() {
        let log = sample_log();
        assert_eq!(log.len(), 5);
        assert_eq!(log.total_added(), 2);
        assert_eq!(log.total_updated(), 4);
        assert_eq!(log.changes(), 3);
    }

    #[test]
    fn find_by_section() {
        let log = sample_log();
        assert_eq!(log.find("label").unwrap().outcome, Outcome::SkipIdentical);
        assert!(log.find("tabSettings").is_none());
    }

    #[test]
    fn json_shape() {
        let action = Action::new(
            "objectPermissions",
            Outcome::Update {
                added: 1,
                updated: 0,
                keyless: 0,
            },
        );
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["section"], "objectPermissions");
        assert_eq!(json["kind"], "update");
        assert_eq!(json["added"], 1);

        let skip = serde_json::to_value(Action::new("x", Outcome::SkipIdentical)).unwrap();
        assert_eq!(skip["kind"], "skip-identical");
    }

    #[test]
    fn log_serializes_as_array() {
        let json = serde_json::to_value(sample_log()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 5);
        assert_eq!(json[0]["kind"], "skip-unknown");
    }
}
