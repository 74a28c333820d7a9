//! Rendering a merge run: plain log file, colored console report, JSON, and
//! dry-run diff.

use std::path::Path;

use colored::{ColoredString, Colorize};
use permerge_merge::{Action, ActionLog, Outcome};
use serde::Serialize;
use similar::TextDiff;

/// Everything the report needs about one run.
pub struct RunSummary<'a> {
    pub profile: &'a str,
    pub permission_set: &'a str,
    pub output: &'a Path,
    pub log: &'a ActionLog,
}

impl RunSummary<'_> {
    pub fn header(&self) -> String {
        format!(
            "Merging {} (Profile) into {} (PermissionSet)",
            self.profile, self.permission_set
        )
    }

    pub fn footer(&self) -> String {
        format!("Merged file written to {}", self.output.display())
    }

    /// The log file: header, one line per action, blank line, footer.
    pub fn to_log_text(&self) -> String {
        let mut text = self.header();
        text.push('\n');
        for action in self.log {
            text.push_str(&action.to_string());
            text.push('\n');
        }
        text.push('\n');
        text.push_str(&self.footer());
        text.push('\n');
        text
    }

    /// Same lines as [`RunSummary::to_log_text`], colored by outcome.
    pub fn print(&self, written: bool) {
        println!("{}", self.header().bold());
        for action in self.log {
            println!("{}", colorize(action));
        }
        println!();
        if written {
            println!("{} {}", "✓".green().bold(), self.footer());
        }
        println!(
            "  {} added, {} updated, {} of {} sections changed",
            self.log.total_added().to_string().green(),
            self.log.total_updated().to_string().green(),
            self.log.changes(),
            self.log.len()
        );
    }

    pub fn to_json(&self, dry_run: bool) -> anyhow::Result<serde_json::Value> {
        #[derive(Serialize)]
        struct Report<'a> {
            profile: &'a str,
            permission_set: &'a str,
            output: String,
            dry_run: bool,
            added: usize,
            updated: usize,
            actions: &'a ActionLog,
        }
        let report = Report {
            profile: self.profile,
            permission_set: self.permission_set,
            output: self.output.display().to_string(),
            dry_run,
            added: self.log.total_added(),
            updated: self.log.total_updated(),
            actions: self.log,
        };
        Ok(serde_json::to_value(report)?)
    }
}

fn colorize(action: &Action) -> ColoredString {
    let line = action.to_string();
    match action.outcome {
        Outcome::Add | Outcome::Update { .. } => line.green(),
        Outcome::Replace => line.yellow(),
        Outcome::SkipUnknown { .. } | Outcome::SkipIdentical => line.dimmed(),
    }
}

/// Unified diff between the original and merged permission set text.
pub fn unified_diff(before: &str, after: &str, original: &str, merged: &str) -> String {
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(3)
        .header(original, merged)
        .to_string()
}
