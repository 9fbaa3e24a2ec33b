//! Error types for tsync operations.
//!
//! This module defines [`TsyncError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration problems are collected and reported together, never one at a time
//! - Everything returned as an error is fatal to the run; non-fatal conditions
//!   are recorded as diagnostics in the [`SyncReport`](crate::sync::SyncReport)
//! - Use `anyhow::Error` (via `TsyncError::Other`) for unexpected errors

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tsync operations.
#[derive(Debug, Error)]
pub enum TsyncError {
    /// Manifest file not found at expected location.
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Manifest file is not valid YAML or does not match the data model.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// One or more structural violations in a manifest.
    #[error("Invalid configuration:{}", bullet_list(.errors))]
    Configuration { errors: Vec<String> },

    /// A component's `var_schema` requires variables nobody provided.
    #[error(
        "Component '{component}' requires variables that were not provided:{}",
        bullet_list(.missing)
    )]
    MissingRequiredVariables {
        component: String,
        missing: Vec<MissingVariable>,
    },

    /// A destination path resolves outside the project root.
    #[error("Path '{path}' escapes the project root '{root}'")]
    PathTraversal { path: PathBuf, root: PathBuf },

    /// A file the run depends on does not exist.
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// Reading a file failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a file failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template references a variable that is not bound.
    #[error("Undefined template variable: {name}")]
    UndefinedVariable { name: String },

    /// A template could not be rendered.
    #[error("Template rendering failed: {message}")]
    Render { message: String },

    /// A document taking part in a merge could not be decoded or encoded.
    #[error("Cannot merge {path} as {format}: {message}")]
    InvalidDocument {
        path: PathBuf,
        format: String,
        message: String,
    },

    /// The provider repository could not be fetched or checked out.
    #[error("Repository error for {url}: {message}")]
    Repository { url: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A required variable absent from every cascade level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingVariable {
    /// Variable name as declared in the schema.
    pub name: String,
    /// Description from the schema, shown to the user.
    pub description: String,
}

impl fmt::Display for MissingVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

fn bullet_list<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(|item| format!("\n  - {}", item)).collect()
}

/// Result type alias for tsync operations.
pub type Result<T> = std::result::Result<T, TsyncError>;
