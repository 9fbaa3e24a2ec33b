//! Provider catalog schema (`.toolkit.yml`).
//!
//! The catalog lists everything a toolkit repository offers: named bundles
//! of components, the files each component owns, and the policy that decides
//! how each file is reconciled with a consumer project.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Variable bindings as they appear in both manifests.
///
/// Values keep whatever YAML type the author wrote (string, number, list, map).
pub type VarMap = BTreeMap<String, serde_json::Value>;

/// Root of the provider manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderCatalog {
    /// Version of the catalog itself.
    #[serde(alias = "toolkit_version")]
    pub version: String,

    /// Named bundles a consumer can request.
    #[serde(alias = "aliases")]
    pub bundles: BTreeMap<String, Bundle>,
}

impl ProviderCatalog {
    /// Look up a bundle by name.
    pub fn bundle(&self, name: &str) -> Option<&Bundle> {
        self.bundles.get(name)
    }
}

/// A named, reusable set of components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub description: String,

    /// Variables shared by every component in the bundle.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: VarMap,

    /// Components in declaration order.
    pub components: Vec<Component>,

    /// Presets of variable defaults selectable per request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<String, Variant>,
}

impl Bundle {
    /// Look up a variant by name.
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.get(name)
    }

    /// Look up a component by id.
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }
}

/// A named preset of variable defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub defaults: VarMap,
}

/// A group of files sharing a variable schema and defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Component {
    /// Unique within its bundle.
    pub id: String,

    #[serde(default)]
    pub description: String,

    /// Contract of variables the component expects.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub var_schema: BTreeMap<String, VarDefinition>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: VarMap,

    /// Files in declaration order.
    pub files: Vec<FileSpec>,
}

impl Component {
    /// Find the file spec with the given `source`.
    pub fn file(&self, source: &str) -> Option<&FileSpec> {
        self.files.iter().find(|f| f.source == source)
    }

    /// Defaults declared by non-required schema entries.
    pub fn schema_defaults(&self) -> VarMap {
        self.var_schema
            .iter()
            .filter_map(|(name, def)| def.default.clone().map(|value| (name.clone(), value)))
            .collect()
    }
}

/// One entry of a component's `var_schema`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VarDefinition {
    pub description: String,

    #[serde(default)]
    pub required: bool,

    /// Only meaningful when `required` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// Provider-side description of one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSpec {
    /// Path relative to the catalog root.
    pub source: String,

    /// Path relative to the consumer project root.
    pub destination: String,

    pub policy: Policy,

    /// Explicit merge content type; only valid with `policy: merge`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_as: Option<MergeType>,

    /// Conflict tie-break; only non-default with `policy: merge`.
    #[serde(default)]
    pub merge_priority: MergePriority,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: VarMap,
}

impl FileSpec {
    /// Create a file spec with default merge settings, no tags and no vars.
    pub fn new(source: impl Into<String>, destination: impl Into<String>, policy: Policy) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            policy,
            merge_as: None,
            merge_priority: MergePriority::default(),
            tags: BTreeSet::new(),
            vars: VarMap::new(),
        }
    }
}

/// Reconciliation strategy for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Always overwrite the destination with the source bytes.
    #[serde(alias = "sync_strict")]
    SyncStrict,
    /// Copy only when the destination does not exist yet.
    Init,
    /// Render the source as a template and overwrite the destination.
    Template,
    /// Merge the source into an existing destination.
    Merge,
}

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::SyncStrict => "sync-strict",
            Policy::Init => "init",
            Policy::Template => "template",
            Policy::Merge => "merge",
        }
    }

    pub fn all() -> [Policy; 4] {
        [Policy::SyncStrict, Policy::Init, Policy::Template, Policy::Merge]
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Content type that selects the merge algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeType {
    /// Key/value hierarchy encoded as YAML.
    Yaml,
    /// Key/value hierarchy encoded as JSON.
    Json,
    /// Line-oriented plain text.
    Text,
}

impl MergeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeType::Yaml => "yaml",
            MergeType::Json => "json",
            MergeType::Text => "text",
        }
    }

    /// Whether this type goes through the structured deep merge.
    pub fn is_structured(&self) -> bool {
        matches!(self, MergeType::Yaml | MergeType::Json)
    }
}

impl fmt::Display for MergeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which side wins when both define the same scalar key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePriority {
    /// Catalog values overwrite project values.
    #[default]
    Toolkit,
    /// Project values are kept.
    Project,
}

impl fmt::Display for MergePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergePriority::Toolkit => write!(f, "toolkit"),
            MergePriority::Project => write!(f, "project"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_catalog() {
        let catalog: ProviderCatalog = serde_yaml::from_str(
            r#"
version: "1.0.0"
bundles:
  simple:
    description: Simple bundle
    components:
      - id: base
        files:
          - source: templates/test.txt
            destination: test.txt
            policy: sync-strict
"#,
        )
        .unwrap();

        let bundle = catalog.bundle("simple").unwrap();
        assert_eq!(catalog.version, "1.0.0");
        assert_eq!(bundle.components[0].id, "base");
        assert_eq!(bundle.components[0].files[0].policy, Policy::SyncStrict);
        assert_eq!(
            bundle.components[0].files[0].merge_priority,
            MergePriority::Toolkit
        );
    }

    #[test]
    fn accepts_legacy_keys() {
        let catalog: ProviderCatalog = serde_yaml::from_str(
            r#"
toolkit_version: "2.0"
aliases:
  python-service:
    description: Python service
    components: []
"#,
        )
        .unwrap();

        assert_eq!(catalog.version, "2.0");
        assert!(catalog.bundle("python-service").is_some());
    }

    #[test]
    fn parses_all_policies() {
        for (raw, expected) in [
            ("sync-strict", Policy::SyncStrict),
            ("sync_strict", Policy::SyncStrict),
            ("init", Policy::Init),
            ("template", Policy::Template),
            ("merge", Policy::Merge),
        ] {
            let policy: Policy = serde_yaml::from_str(raw).unwrap();
            assert_eq!(policy, expected);
        }
    }

    #[test]
    fn rejects_unknown_policy() {
        let result: std::result::Result<Policy, _> = serde_yaml::from_str("overwrite");
        assert!(result.is_err());
    }

    #[test]
    fn parses_merge_settings() {
        let file: FileSpec = serde_yaml::from_str(
            r#"
source: configs/settings.conf
destination: settings.conf
policy: merge
merge_as: yaml
merge_priority: project
tags: [common, "lang:python"]
"#,
        )
        .unwrap();

        assert_eq!(file.merge_as, Some(MergeType::Yaml));
        assert_eq!(file.merge_priority, MergePriority::Project);
        assert!(file.tags.contains("lang:python"));
    }

    #[test]
    fn schema_defaults_skip_required_entries() {
        let component: Component = serde_yaml::from_str(
            r#"
id: docker
var_schema:
  python_version:
    description: Python version
    required: true
  workdir:
    description: Working directory
    default: /app
files: []
"#,
        )
        .unwrap();

        let defaults = component.schema_defaults();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults["workdir"], serde_json::json!("/app"));
    }

    #[test]
    fn component_lookup_by_id_and_source() {
        let bundle = Bundle {
            components: vec![Component {
                id: "linters".into(),
                files: vec![FileSpec::new("a.yml", "a.yml", Policy::Init)],
                ..Default::default()
            }],
            ..Default::default()
        };

        let component = bundle.component("linters").unwrap();
        assert!(component.file("a.yml").is_some());
        assert!(component.file("b.yml").is_none());
        assert!(bundle.component("missing").is_none());
    }
}
