//! Content reconciliation for the merge policy.
//!
//! Two algorithms, chosen by content type:
//! - Structured deep merge for YAML and JSON in [`structured`]
//! - Line-set union for everything else in [`text`]
//!
//! Format-specific decoding and encoding lives in [`codec`].

pub mod codec;
pub mod structured;
pub mod text;

use std::path::Path;

use crate::error::Result;
use crate::manifest::{FileSpec, MergePriority, MergeType};

pub use structured::deep_merge;
pub use text::merge_lines;

/// Infer the content type from a path's extension.
///
/// `.yaml`/`.yml` are YAML, `.json` is JSON, anything else is plain text.
pub fn content_type_from_extension(path: &Path) -> MergeType {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("yaml") | Some("yml") => MergeType::Yaml,
        Some("json") => MergeType::Json,
        _ => MergeType::Text,
    }
}

/// Content type for a merge-policy file.
///
/// An explicit `merge_as` wins; otherwise the destination's extension decides.
pub fn content_type_for(file: &FileSpec, destination: &Path) -> MergeType {
    file.merge_as
        .unwrap_or_else(|| content_type_from_extension(destination))
}

/// Merge `incoming` into `base` and return the new content.
///
/// Fails closed: when either document cannot be decoded nothing is produced.
/// `path` is only used for error reporting.
pub fn merge_content(
    content_type: MergeType,
    base: &str,
    incoming: &str,
    priority: MergePriority,
    path: &Path,
) -> Result<String> {
    if !content_type.is_structured() {
        return Ok(merge_lines(base, incoming));
    }

    let base_value = codec::decode(content_type, base, path)?;
    let incoming_value = codec::decode(content_type, incoming, path)?;
    let merged = deep_merge(&base_value, &incoming_value, priority);
    codec::encode(content_type, &merged, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Policy;

    #[test]
    fn extension_mapping() {
        assert_eq!(content_type_from_extension(Path::new("a.yaml")), MergeType::Yaml);
        assert_eq!(content_type_from_extension(Path::new("a.YML")), MergeType::Yaml);
        assert_eq!(content_type_from_extension(Path::new("a.json")), MergeType::Json);
        assert_eq!(content_type_from_extension(Path::new(".gitignore")), MergeType::Text);
        assert_eq!(content_type_from_extension(Path::new("a.toml")), MergeType::Text);
    }

    #[test]
    fn explicit_merge_as_wins() {
        let mut file = FileSpec::new("settings.conf", "settings.conf", Policy::Merge);
        assert_eq!(content_type_for(&file, Path::new("settings.conf")), MergeType::Text);

        file.merge_as = Some(MergeType::Yaml);
        assert_eq!(content_type_for(&file, Path::new("settings.conf")), MergeType::Yaml);
    }

    #[test]
    fn merges_json_documents() {
        let merged = merge_content(
            MergeType::Json,
            r#"{"name": "project", "local": "x"}"#,
            r#"{"name": "toolkit", "new": "y"}"#,
            MergePriority::Toolkit,
            Path::new("package.json"),
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&merged).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "toolkit", "local": "x", "new": "y"})
        );
    }

    #[test]
    fn merges_yaml_documents() {
        let merged = merge_content(
            MergeType::Yaml,
            "name: project\nlocal: x\n",
            "name: toolkit\nnew: y\n",
            MergePriority::Project,
            Path::new("config.yml"),
        )
        .unwrap();
        assert_eq!(merged, "name: project\nlocal: x\nnew: y\n");
    }

    #[test]
    fn text_ignores_priority() {
        let toolkit = merge_content(
            MergeType::Text,
            "a\n",
            "b\n",
            MergePriority::Toolkit,
            Path::new(".gitignore"),
        )
        .unwrap();
        let project = merge_content(
            MergeType::Text,
            "a\n",
            "b\n",
            MergePriority::Project,
            Path::new(".gitignore"),
        )
        .unwrap();
        assert_eq!(toolkit, project);
    }

    #[test]
    fn invalid_source_fails_closed() {
        let result = merge_content(
            MergeType::Json,
            r#"{"a": 1}"#,
            "not json",
            MergePriority::Toolkit,
            Path::new("a.json"),
        );
        assert!(result.is_err());
    }
}
