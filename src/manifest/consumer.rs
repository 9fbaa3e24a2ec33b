//! Consumer manifest schema (`.project.toolkit.yml`).
//!
//! The consumer manifest names the provider repository and version, the
//! bundles to pull, and any project-specific overrides of paths, variables
//! and file selection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::provider::VarMap;

/// Root of the consumer manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerManifest {
    /// Where to fetch the catalog from.
    pub provider: ProviderSource,

    /// Project-wide variables, the lowest consumer-side priority.
    #[serde(default)]
    pub vars: VarMap,

    /// Bundles to synchronize, in order.
    pub sync: Vec<SyncRequest>,
}

/// Location and version of the provider catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSource {
    /// Git URL (or local path) of the catalog repository.
    pub url: String,
    /// Branch, tag or commit to check out.
    pub version: String,
}

/// One requested bundle and its overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    #[serde(alias = "alias")]
    pub bundle: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ComponentOverride>,
}

impl SyncRequest {
    pub fn new(bundle: impl Into<String>) -> Self {
        Self {
            bundle: bundle.into(),
            variant: None,
            overrides: Vec::new(),
        }
    }
}

/// Consumer-side changes to one component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentOverride {
    /// Must match a `Component::id` in the requested bundle.
    pub id: String,

    /// Skip every file of the component.
    #[serde(default)]
    pub skip: bool,

    /// Prefix placed before each file's base destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_root: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_tags: Option<BTreeSet<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_tags: Option<BTreeSet<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<VarMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileOverride>>,
}

impl ComponentOverride {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// File overrides, empty when none were given.
    pub fn file_overrides(&self) -> &[FileOverride] {
        self.files.as_deref().unwrap_or_default()
    }

    /// Whether any setting besides `id` and `skip` is present.
    pub fn has_settings(&self) -> bool {
        self.destination_root.is_some()
            || self.include_tags.is_some()
            || self.exclude_tags.is_some()
            || self.vars.is_some()
            || self.files.is_some()
    }
}

/// Consumer-side changes to one file of a component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileOverride {
    /// Must match a `FileSpec::source` in the component.
    pub source: String,

    /// Replacement destination, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    #[serde(default)]
    pub skip: bool,

    /// Highest-priority variables for this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<VarMap>,
}

impl FileOverride {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }
}
