//! Destination path construction.

use std::path::{Path, PathBuf};

use crate::manifest::{ComponentOverride, FileSpec};
use crate::resolve::overrides::destination_override;

/// Compute where a file lands inside the project.
///
/// Precedence, highest first: the file override's `destination`, then the
/// base destination under the component's `destination_root`, then the base
/// destination alone. The result is not checked for containment here; the
/// caller hands it to [`FileSystem::ensure_contained`](crate::fs::FileSystem::ensure_contained).
pub fn build_destination(
    project_root: &Path,
    file: &FileSpec,
    component_override: Option<&ComponentOverride>,
) -> PathBuf {
    if let Some(destination) = destination_override(component_override, &file.source) {
        return project_root.join(destination);
    }

    match component_override.and_then(|o| o.destination_root.as_deref()) {
        Some(root) => project_root.join(root).join(&file.destination),
        None => project_root.join(&file.destination),
    }
}
