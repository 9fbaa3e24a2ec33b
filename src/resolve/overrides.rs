//! Lookup of consumer overrides.
//!
//! Matching is exact string equality. When a list holds duplicates the first
//! entry wins; the validator reports the duplicate as a warning.

use crate::manifest::{ComponentOverride, FileOverride};

/// Find the override for component `id`.
pub fn find_component_override<'a>(
    overrides: &'a [ComponentOverride],
    id: &str,
) -> Option<&'a ComponentOverride> {
    overrides.iter().find(|o| o.id == id)
}

/// Find the file override for `source` inside a component override.
pub fn find_file_override<'a>(
    component_override: Option<&'a ComponentOverride>,
    source: &str,
) -> Option<&'a FileOverride> {
    component_override?
        .file_overrides()
        .iter()
        .find(|f| f.source == source)
}

/// Whether the file override for `source` asks to skip it.
pub fn is_file_skipped(component_override: Option<&ComponentOverride>, source: &str) -> bool {
    find_file_override(component_override, source).is_some_and(|f| f.skip)
}

/// Replacement destination for `source`, if the consumer gave one.
pub fn destination_override<'a>(
    component_override: Option<&'a ComponentOverride>,
    source: &str,
) -> Option<&'a str> {
    find_file_override(component_override, source)?
        .destination
        .as_deref()
}
