//! Merge engine for permerge.
//!
//! Folds a Salesforce Profile into a PermissionSet under a least-restrictive
//! policy: keyed entries are unioned by identity, boolean fields that either
//! side enables stay enabled, and sections the target schema does not know
//! are dropped.
//!
//! # Key Types
//!
//! - [`MergeEngine`]: Runs one merge and returns its [`ActionLog`]
//! - [`Schema`] / [`SectionKind`]: Allow-list and identity-field table
//! - [`IdentityKey`]: `(section, identity text)` of a keyed entry
//! - [`MergeConfig`]: TOML configuration (schema extensions, options)

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod keyer;
pub mod reconcile;
pub mod schema;
pub mod sections;

pub use action::{Action, ActionLog, Outcome};
pub use config::{MergeConfig, MergeOptions, SchemaConfig};
pub use engine::MergeEngine;
pub use error::{MergeError, MergeResult};
pub use keyer::{identity_key, index_entries, IdentityKey};
pub use reconcile::{is_boolean_like, least_restrictive, reconcile};
pub use schema::{Schema, SectionKind, IDENTITY_FIELDS, VALID_SECTIONS};
pub use sections::{group_sections, Sections};
