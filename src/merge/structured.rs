//! Deep merge of key/value documents.
//!
//! Works on [`serde_yaml::Value`] as the common tree for both YAML and JSON.
//!
//! # Merge Rules
//!
//! - Mappings present on both sides are merged recursively
//! - Keys only in `base` are always kept
//! - Keys only in `incoming` are always added
//! - Any other collision (scalars, sequences, mixed types) is settled by the
//!   priority: `Toolkit` takes `incoming`, `Project` keeps `base`
//! - Sequences are atomic; they are never merged element-wise
//! - `null` in `incoming` is a real value, not a deletion

use serde_yaml::Value;

use crate::manifest::MergePriority;

/// Deep merge `incoming` into `base`.
///
/// # Arguments
///
/// * `base` - The existing document at the destination
/// * `incoming` - The document shipped by the catalog
/// * `priority` - Which side wins a collision
///
/// # Returns
///
/// A new Value; neither input is modified
pub fn deep_merge(base: &Value, incoming: &Value, priority: MergePriority) -> Value {
    match (base, incoming) {
        (Value::Mapping(base_map), Value::Mapping(incoming_map)) => {
            let mut result = base_map.clone();

            for (key, incoming_value) in incoming_map {
                match base_map.get(key) {
                    Some(base_value) => {
                        result.insert(key.clone(), deep_merge(base_value, incoming_value, priority));
                    }
                    None => {
                        result.insert(key.clone(), incoming_value.clone());
                    }
                }
            }

            Value::Mapping(result)
        }

        _ => match priority {
            MergePriority::Toolkit => incoming.clone(),
            MergePriority::Project => base.clone(),
        },
    }
}
