//! Manifest schemas, loading and validation.
//!
//! - Provider catalog types in [`provider`]
//! - Consumer manifest types in [`consumer`]
//! - File loading in [`loader`]
//! - Structural validation in [`validator`]

pub mod consumer;
pub mod loader;
pub mod provider;
pub mod validator;

pub use consumer::{ComponentOverride, ConsumerManifest, FileOverride, ProviderSource, SyncRequest};
pub use loader::{
    catalog_path, load_consumer_manifest, load_provider_catalog, manifest_path,
    parse_consumer_manifest, parse_provider_catalog, CONSUMER_MANIFEST, PROVIDER_MANIFEST,
};
pub use provider::{
    Bundle, Component, FileSpec, MergePriority, MergeType, Policy, ProviderCatalog, VarDefinition,
    VarMap, Variant,
};
pub use validator::{
    validate_against_catalog, validate_catalog, validate_manifest, Severity, ValidationError,
};
