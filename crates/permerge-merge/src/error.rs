//! Error types for the merge crate.

use std::path::PathBuf;

use permerge_types::TypeError;

/// Errors that can occur while configuring or running a merge.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// An input document is not of the kind its role requires.
    #[error("document error: {0}")]
    Document(#[from] TypeError),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has unknown keys.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration parsed but describes an unusable schema.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
