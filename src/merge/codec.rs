//! Decoding and encoding of structured merge documents.
//!
//! Both YAML and JSON decode into [`serde_yaml::Value`] so the deep merge
//! never needs to know which format it is working on.

use std::path::Path;

use serde_yaml::Value;

use crate::error::{Result, TsyncError};
use crate::manifest::MergeType;

/// Decode `content` as `format`.
///
/// An empty YAML document is rejected: merging against it would silently
/// discard the destination.
pub fn decode(format: MergeType, content: &str, path: &Path) -> Result<Value> {
    match format {
        MergeType::Yaml => {
            let value: Value = serde_yaml::from_str(content)
                .map_err(|e| invalid(path, format, e.to_string()))?;
            if value.is_null() {
                return Err(invalid(path, format, "document is empty".to_string()));
            }
            Ok(value)
        }
        MergeType::Json => {
            let json: serde_json::Value = serde_json::from_str(content)
                .map_err(|e| invalid(path, format, e.to_string()))?;
            serde_yaml::to_value(json).map_err(|e| invalid(path, format, e.to_string()))
        }
        MergeType::Text => Err(invalid(
            path,
            format,
            "plain text has no structured form".to_string(),
        )),
    }
}

/// Encode `value` as `format`.
///
/// JSON is pretty-printed with two-space indentation and a trailing newline.
/// YAML keeps mapping order.
pub fn encode(format: MergeType, value: &Value, path: &Path) -> Result<String> {
    match format {
        MergeType::Yaml => {
            serde_yaml::to_string(value).map_err(|e| invalid(path, format, e.to_string()))
        }
        MergeType::Json => {
            let json = serde_json::to_value(value)
                .map_err(|e| invalid(path, format, e.to_string()))?;
            let mut out = serde_json::to_string_pretty(&json)
                .map_err(|e| invalid(path, format, e.to_string()))?;
            out.push('\n');
            Ok(out)
        }
        MergeType::Text => Err(invalid(
            path,
            format,
            "plain text has no structured form".to_string(),
        )),
    }
}

fn invalid(path: &Path, format: MergeType, message: String) -> TsyncError {
    TsyncError::InvalidDocument {
        path: path.to_path_buf(),
        format: format.to_string(),
        message,
    }
}
