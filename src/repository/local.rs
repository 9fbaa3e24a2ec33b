//! Catalog served from a directory that is already on disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::CatalogRepository;
use crate::error::{Result, TsyncError};

/// Returns one fixed directory regardless of the requested URL and version.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CatalogRepository for LocalRepository {
    fn resolve_version(&self, url: &str, version: &str) -> Result<PathBuf> {
        if !self.root.is_dir() {
            return Err(TsyncError::Repository {
                url: url.to_string(),
                message: format!("{} is not a directory", self.root.display()),
            });
        }

        debug!(
            "Using local catalog {} in place of {}@{}",
            self.root.display(),
            url,
            version
        );
        Ok(self.root.clone())
    }
}
