//! Manifest discovery and loading.
//!
//! Both manifests live at fixed names: the catalog at the root of the
//! provider repository and the consumer manifest at the root of the project.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::consumer::ConsumerManifest;
use super::provider::ProviderCatalog;
use crate::error::{Result, TsyncError};

/// File name of the provider catalog.
pub const PROVIDER_MANIFEST: &str = ".toolkit.yml";

/// File name of the consumer manifest.
pub const CONSUMER_MANIFEST: &str = ".project.toolkit.yml";

/// Path of the catalog inside a checked-out provider repository.
pub fn catalog_path(provider_root: &Path) -> PathBuf {
    provider_root.join(PROVIDER_MANIFEST)
}

/// Path of the consumer manifest inside a project.
pub fn manifest_path(project_root: &Path) -> PathBuf {
    project_root.join(CONSUMER_MANIFEST)
}

/// Load the provider catalog from a file.
///
/// # Errors
///
/// Returns `ManifestNotFound` if the file doesn't exist.
/// Returns `ManifestParse` if the YAML is invalid or doesn't match the schema.
pub fn load_provider_catalog(path: &Path) -> Result<ProviderCatalog> {
    parse_provider_catalog(&read_manifest(path)?, path)
}

/// Load the consumer manifest from a file.
///
/// # Errors
///
/// Returns `ManifestNotFound` if the file doesn't exist.
/// Returns `ManifestParse` if the YAML is invalid or doesn't match the schema.
pub fn load_consumer_manifest(path: &Path) -> Result<ConsumerManifest> {
    parse_consumer_manifest(&read_manifest(path)?, path)
}

/// Parse YAML content into a provider catalog.
///
/// `source_path` is only used for error reporting.
pub fn parse_provider_catalog(content: &str, source_path: &Path) -> Result<ProviderCatalog> {
    parse(content, source_path)
}

/// Parse YAML content into a consumer manifest.
///
/// `source_path` is only used for error reporting.
pub fn parse_consumer_manifest(content: &str, source_path: &Path) -> Result<ConsumerManifest> {
    parse(content, source_path)
}

fn read_manifest(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TsyncError::ManifestNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TsyncError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

fn parse<T: DeserializeOwned>(content: &str, source_path: &Path) -> Result<T> {
    serde_yaml::from_str(content).map_err(|e| TsyncError::ManifestParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
