//! tsync - Synchronize shared toolkit files into consumer projects.
//!
//! A provider repository publishes a catalog (`.toolkit.yml`) of bundles,
//! components and files. A consumer project lists the bundles it wants in
//! `.project.toolkit.yml`, optionally overriding variables, destinations and
//! file selection. tsync resolves every file and applies its policy:
//! overwrite, initialize once, render a template, or merge.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`fs`] - File-system access and path containment
//! - [`manifest`] - Manifest schemas, loading and validation
//! - [`merge`] - Structured and line-based merging
//! - [`policy`] - Per-policy file handlers
//! - [`render`] - Template rendering
//! - [`repository`] - Catalog checkout (git cache or local directory)
//! - [`resolve`] - Variables, tags, overrides and destinations
//! - [`sync`] - The sync engine and its report
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tsync::resolve::{VarLayer, VarLayerStack, VarSource};
//!
//! let mut global = VarLayer::new(VarSource::Global);
//! global.set("python_version", "3.11");
//!
//! let mut bundle = VarLayer::new(VarSource::Bundle);
//! bundle.set("python_version", "3.12");
//!
//! let mut stack = VarLayerStack::new();
//! stack.push(global);
//! stack.push(bundle);
//!
//! assert_eq!(stack.resolve()["python_version"], json!("3.12"));
//! ```
//!
//! For end-to-end runs against a scratch project, see the integration tests.

pub mod cli;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod merge;
pub mod policy;
pub mod render;
pub mod repository;
pub mod resolve;
pub mod sync;
pub mod ui;

pub use error::{Result, TsyncError};
