use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use permerge_merge::{MergeConfig, MergeEngine, Schema};
use permerge_types::DocumentKind;
use permerge_xml::{write_document, WriteOptions};
use tracing::info;

use crate::cli::*;
use crate::discover::{Discovered, Input};
use crate::report::{unified_diff, RunSummary};

pub const DEFAULT_OUTPUT: &str = "Merged.permissionset-meta.xml";
pub const DEFAULT_LOG_FILE: &str = "merge_log.txt";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args, &cli.format),
        Command::Detect(args) => cmd_detect(args, &cli.format),
        Command::Sections(args) => cmd_sections(args, &cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MergeConfig> {
    match path {
        Some(path) => Ok(MergeConfig::load(path)?),
        None => Ok(MergeConfig::default()),
    }
}

/// Resolve the two inputs: explicit paths win, the rest come from discovery.
fn resolve_inputs(args: &MergeArgs, exclude: &[PathBuf]) -> anyhow::Result<(Input, Input)> {
    if let (Some(profile), Some(pset)) = (&args.profile, &args.permission_set) {
        return Ok((
            Input::load(profile, DocumentKind::Profile)?,
            Input::load(pset, DocumentKind::PermissionSet)?,
        ));
    }
    let mut found = Discovered::scan(&args.dir, exclude)?;
    let profile = match &args.profile {
        Some(path) => Input::load(path, DocumentKind::Profile)?,
        None => found.take_one(DocumentKind::Profile)?,
    };
    let pset = match &args.permission_set {
        Some(path) => Input::load(path, DocumentKind::PermissionSet)?,
        None => found.take_one(DocumentKind::PermissionSet)?,
    };
    Ok((profile, pset))
}

fn cmd_merge(args: MergeArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let output = args.output.clone().unwrap_or_else(|| args.dir.join(DEFAULT_OUTPUT));
    let log_file = args.log_file.clone().unwrap_or_else(|| args.dir.join(DEFAULT_LOG_FILE));

    let config = load_config(args.config.as_deref())?;
    let engine = MergeEngine::from_config(&config)?;
    let (profile, pset) = resolve_inputs(&args, std::slice::from_ref(&output))?;
    info!(
        profile = %profile.path.display(),
        permission_set = %pset.path.display(),
        "inputs resolved"
    );

    let (merged, log) = engine.merge_documents(&profile.document, &pset.document)?;
    let write_options = WriteOptions {
        indent: args.indent,
        ..Default::default()
    };
    let merged_text = write_document(&merged, &write_options);

    let profile_name = profile.file_name();
    let pset_name = pset.file_name();
    let summary = RunSummary {
        profile: &profile_name,
        permission_set: &pset_name,
        output: &output,
        log: &log,
    };

    if args.dry_run {
        let diff = preview_diff(&engine, &pset, &merged_text, &output, &write_options);
        match format {
            OutputFormat::Json => {
                let mut json = summary.to_json(true)?;
                json["diff"] = serde_json::Value::String(diff);
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Text => {
                summary.print(false);
                println!();
                if diff.is_empty() {
                    println!("{}", "No changes to the permission set.".dimmed());
                } else {
                    print!("{diff}");
                }
            }
        }
        return Ok(());
    }

    fs::write(&output, &merged_text)
        .with_context(|| format!("failed to write {}", output.display()))?;
    fs::write(&log_file, summary.to_log_text())
        .with_context(|| format!("failed to write {}", log_file.display()))?;
    info!(output = %output.display(), log = %log_file.display(), "merge written");

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary.to_json(false)?)?)
        }
        OutputFormat::Text => summary.print(true),
    }
    Ok(())
}

/// Diff of the permission set as read against the merged text. The original
/// is laid out the way the engine lays out its output, so only merge changes
/// show up.
fn preview_diff(
    engine: &MergeEngine,
    pset: &Input,
    merged_text: &str,
    output: &Path,
    write_options: &WriteOptions,
) -> String {
    let mut original = pset.document.clone();
    if engine.options().strip_namespaces {
        original.strip_namespaces();
    }
    let original_text = write_document(&original, write_options);
    unified_diff(
        &original_text,
        merged_text,
        &pset.path.display().to_string(),
        &output.display().to_string(),
    )
}

fn cmd_detect(args: DetectArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let found = Discovered::scan(&args.dir, &[])?;
    let listed = |inputs: &[Input]| -> Vec<String> {
        inputs.iter().map(|i| i.path.display().to_string()).collect()
    };
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "profiles": listed(&found.profiles),
                "permission_sets": listed(&found.permission_sets),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            for (kind, inputs) in [
                (DocumentKind::Profile, &found.profiles),
                (DocumentKind::PermissionSet, &found.permission_sets),
            ] {
                let marker = if inputs.len() == 1 { "✓".green() } else { "✗".red() };
                println!("{} {} ({})", marker, kind.to_string().bold(), inputs.len());
                for path in listed(inputs) {
                    println!("    {path}");
                }
            }
        }
    }
    Ok(())
}

fn cmd_sections(args: SectionsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let engine = MergeEngine::from_config(&config)?;
    let schema = engine.schema();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sections_json(schema))?),
        OutputFormat::Text => {
            for section in schema.valid_sections() {
                match schema.identity_field(section) {
                    Some(field) => println!("  {:<32} keyed by {}", section, field.cyan()),
                    None => println!("  {:<32} {}", section, "singular".dimmed()),
                }
            }
        }
    }
    Ok(())
}

fn sections_json(schema: &Schema) -> serde_json::Value {
    let sections: Vec<serde_json::Value> = schema
        .valid_sections()
        .map(|section| {
            serde_json::json!({
                "section": section,
                "classification": schema.classify(section),
            })
        })
        .collect();
    serde_json::Value::Array(sections)
}
