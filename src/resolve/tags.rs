//! Tag-based file selection.

use crate::manifest::{ComponentOverride, FileSpec};

/// Decide whether a file passes the override's tag filter.
///
/// Without an override every file is included. A non-empty `include_tags`
/// requires at least one shared tag; `exclude_tags` is checked afterwards and
/// vetoes any file it intersects.
pub fn should_include(file: &FileSpec, component_override: Option<&ComponentOverride>) -> bool {
    let Some(component_override) = component_override else {
        return true;
    };

    if let Some(include) = &component_override.include_tags {
        if !include.is_empty() && file.tags.is_disjoint(include) {
            return false;
        }
    }

    if let Some(exclude) = &component_override.exclude_tags {
        if !file.tags.is_disjoint(exclude) {
            return false;
        }
    }

    true
}
