//! Synchronization of a consumer project with its provider catalog.
//!
//! - [`SyncEngine`] walks the manifests and dispatches each file
//! - [`SyncReport`] collects per-file outcomes and diagnostics
//! - [`Workspace`] loads both manifests and the catalog checkout
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tsync::repository::GitRepository;
//! use tsync::sync::{sync_project, SyncOptions};
//!
//! let repository = GitRepository::new("/tmp/tsync-cache");
//! let report = sync_project(Path::new("."), &repository, SyncOptions::default()).unwrap();
//! println!("{} file(s) written", report.written());
//! ```

pub mod engine;
pub mod report;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::manifest::{
    catalog_path, load_consumer_manifest, load_provider_catalog, manifest_path,
    ConsumerManifest, ProviderCatalog,
};
use crate::repository::CatalogRepository;

pub use engine::{validate, SyncEngine, SyncOptions};
pub use report::{Diagnostic, DiagnosticLevel, FileOutcome, SyncReport};

/// A consumer project together with the catalog it asks for.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub project_root: PathBuf,
    pub manifest: ConsumerManifest,
    /// Checkout the catalog was loaded from.
    pub catalog_root: PathBuf,
    pub catalog: ProviderCatalog,
}

impl Workspace {
    /// Load the project's manifest, fetch its catalog and load that too.
    ///
    /// # Errors
    ///
    /// Returns `ManifestNotFound` or `ManifestParse` for either manifest and
    /// `Repository` if the catalog cannot be checked out.
    pub fn load(project_root: &Path, repository: &dyn CatalogRepository) -> Result<Self> {
        let manifest = load_consumer_manifest(&manifest_path(project_root))?;

        info!(
            "Resolving catalog {} at {}",
            manifest.provider.url, manifest.provider.version
        );
        let catalog_root =
            repository.resolve_version(&manifest.provider.url, &manifest.provider.version)?;
        let catalog = load_provider_catalog(&catalog_path(&catalog_root))?;

        Ok(Self {
            project_root: project_root.to_path_buf(),
            manifest,
            catalog_root,
            catalog,
        })
    }

    /// Run the engine over this workspace.
    pub fn sync(&self, engine: &SyncEngine) -> Result<SyncReport> {
        engine.run(
            &self.catalog,
            &self.catalog_root,
            &self.manifest,
            &self.project_root,
        )
    }
}

/// Load `project_root`'s workspace and synchronize it with the local disk.
pub fn sync_project(
    project_root: &Path,
    repository: &dyn CatalogRepository,
    options: SyncOptions,
) -> Result<SyncReport> {
    let workspace = Workspace::load(project_root, repository)?;
    workspace.sync(&SyncEngine::default().with_options(options))
}
