use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, MergeResult};
use crate::schema::Schema;

/// Configuration for a merge run.
///
/// The default is the builtin schema with both cleanup passes enabled. A TOML
/// file may extend or replace the schema tables:
///
/// ```toml
/// [schema]
/// extend_builtin = true
/// valid_sections = ["externalDataSourceAccesses"]
///
/// [schema.identity_fields]
/// externalDataSourceAccesses = "externalDataSource"
///
/// [options]
/// prune_unknown_target_sections = false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub options: MergeOptions,
}

impl MergeConfig {
    /// Parse a TOML configuration.
    pub fn from_toml_str(s: &str) -> MergeResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> MergeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| MergeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Schema table overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Start from the builtin tables (`true`) or from nothing (`false`).
    #[serde(default = "default_true")]
    pub extend_builtin: bool,
    /// Additional singular sections.
    #[serde(default)]
    pub valid_sections: Vec<String>,
    /// Additional keyed sections, section name to identity field.
    #[serde(default)]
    pub identity_fields: BTreeMap<String, String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            extend_builtin: true,
            valid_sections: Vec::new(),
            identity_fields: BTreeMap::new(),
        }
    }
}

impl SchemaConfig {
    /// Build the effective schema.
    pub fn to_schema(&self) -> MergeResult<Schema> {
        let mut schema = if self.extend_builtin {
            Schema::builtin()
        } else {
            Schema::empty()
        };
        for section in &self.valid_sections {
            schema.add_section(section)?;
        }
        for (section, field) in &self.identity_fields {
            schema.add_keyed_section(section, field)?;
        }
        Ok(schema)
    }
}

/// Behavior switches for the merge engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeOptions {
    /// Remove top-level target sections that are not in the schema, so the
    /// output never contains unknown sections.
    #[serde(default = "default_true")]
    pub prune_unknown_target_sections: bool,
    /// Strip namespaces from every tag of the merged document.
    #[serde(default = "default_true")]
    pub strip_namespaces: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            prune_unknown_target_sections: true,
            strip_namespaces: true,
        }
    }
}

fn default_true() -> bool {
    true
}
