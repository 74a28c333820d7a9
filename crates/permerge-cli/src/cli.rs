use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "permerge",
    about = "Merge a Salesforce Profile into a PermissionSet (least restrictive wins)",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge the Profile in a directory into its PermissionSet
    Merge(MergeArgs),
    /// List the permission documents found in a directory
    Detect(DetectArgs),
    /// Show the section table used for merging
    Sections(SectionsArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Directory scanned for the two input documents
    #[arg(default_value = ".")]
    pub dir: PathBuf,
    /// Profile to merge from (skips discovery of the profile)
    #[arg(long)]
    pub profile: Option<PathBuf>,
    /// PermissionSet to merge into (skips discovery of the permission set)
    #[arg(long = "permission-set")]
    pub permission_set: Option<PathBuf>,
    /// Merged output file [default: DIR/Merged.permissionset-meta.xml]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Action log file [default: DIR/merge_log.txt]
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// TOML file extending or replacing the section table
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Spaces per indentation level in the output
    #[arg(long, default_value = "4")]
    pub indent: usize,
    /// Print a diff of the permission set instead of writing files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct DetectArgs {
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Args)]
pub struct SectionsArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
