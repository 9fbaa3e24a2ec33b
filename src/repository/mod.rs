//! Access to the provider catalog checkout.
//!
//! - [`GitRepository`] clones catalogs into a local cache and checks out the
//!   requested version
//! - [`LocalRepository`] serves an existing directory as-is

pub mod git;
pub mod local;

use std::path::PathBuf;

use crate::error::Result;

pub use git::GitRepository;
pub use local::LocalRepository;

/// Source of provider catalog checkouts.
pub trait CatalogRepository {
    /// Return a local directory holding the catalog at `version`.
    ///
    /// Any failure is fatal to the run.
    fn resolve_version(&self, url: &str, version: &str) -> Result<PathBuf>;
}
