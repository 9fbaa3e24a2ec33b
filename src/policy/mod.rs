//! Per-file reconciliation policies.
//!
//! This module provides:
//! - [`ResolutionContext`] with everything one file needs
//! - [`PolicyHandler`] trait, one implementation per [`Policy`]
//! - [`PolicyDispatcher`] routing a context to its handler

pub mod init;
pub mod merge;
pub mod sync_strict;
pub mod template;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Result, TsyncError};
use crate::fs::FileSystem;
use crate::manifest::{FileSpec, Policy, VarMap};
use crate::render::{Renderer, TemplateRenderer};

pub use init::InitHandler;
pub use merge::MergeHandler;
pub use sync_strict::SyncStrictHandler;
pub use template::TemplateHandler;

/// Fully resolved inputs for one file.
#[derive(Debug, Clone)]
pub struct ResolutionContext<'a> {
    /// Absolute path of the source inside the catalog checkout.
    pub source_path: PathBuf,
    /// Absolute path of the destination inside the project.
    pub destination_path: PathBuf,
    pub file: &'a FileSpec,
    /// Effective variables after the full cascade.
    pub vars: VarMap,
    /// Whether the destination existed before this file was handled.
    pub destination_exists: bool,
}

/// What a handler did, or would do, with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileAction {
    /// Source bytes written to the destination.
    Copied,
    /// Existing destination left alone.
    Preserved,
    /// Rendered template written to the destination.
    Rendered,
    /// Merged content written to the destination.
    Merged,
    /// Merge produced the existing content; nothing written.
    Unchanged,
}

impl FileAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileAction::Copied => "copy",
            FileAction::Preserved => "preserve",
            FileAction::Rendered => "render",
            FileAction::Merged => "merge",
            FileAction::Unchanged => "unchanged",
        }
    }

    /// Whether the destination is written.
    pub fn writes(&self) -> bool {
        matches!(
            self,
            FileAction::Copied | FileAction::Rendered | FileAction::Merged
        )
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy for one [`Policy`].
pub trait PolicyHandler {
    /// The policy this handler implements.
    fn policy(&self) -> Policy;

    /// The action [`apply`](Self::apply) would take.
    ///
    /// Reads whatever `apply` reads and fails the same way, but never writes.
    fn preview(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<FileAction>;

    /// Reconcile the destination with the source.
    fn apply(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<FileAction>;
}

/// Routes each file to the handler registered for its policy.
pub struct PolicyDispatcher {
    handlers: HashMap<Policy, Box<dyn PolicyHandler>>,
}

impl PolicyDispatcher {
    /// Dispatcher with no handlers.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Dispatcher with all four handlers, rendering templates with `renderer`.
    pub fn new(renderer: Box<dyn TemplateRenderer>) -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.register(Box::new(SyncStrictHandler));
        dispatcher.register(Box::new(InitHandler));
        dispatcher.register(Box::new(TemplateHandler::new(renderer)));
        dispatcher.register(Box::new(MergeHandler));
        dispatcher
    }

    /// Add or replace the handler for its policy.
    pub fn register(&mut self, handler: Box<dyn PolicyHandler>) {
        self.handlers.insert(handler.policy(), handler);
    }

    pub fn handler(&self, policy: Policy) -> Option<&dyn PolicyHandler> {
        self.handlers.get(&policy).map(|h| h.as_ref())
    }

    /// Apply the file's policy. `None` when no handler is registered for it.
    pub fn dispatch(
        &self,
        ctx: &ResolutionContext<'_>,
        fs: &dyn FileSystem,
    ) -> Result<Option<FileAction>> {
        match self.handler(ctx.file.policy) {
            Some(handler) => handler.apply(ctx, fs).map(Some),
            None => Ok(None),
        }
    }

    /// Predict the file's action. `None` when no handler is registered for it.
    pub fn preview(
        &self,
        ctx: &ResolutionContext<'_>,
        fs: &dyn FileSystem,
    ) -> Result<Option<FileAction>> {
        match self.handler(ctx.file.policy) {
            Some(handler) => handler.preview(ctx, fs).map(Some),
            None => Ok(None),
        }
    }
}

/// Fail with `NotFound` unless the context's source exists.
fn require_source(ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<()> {
    if fs.exists(&ctx.source_path) {
        Ok(())
    } else {
        Err(TsyncError::NotFound {
            path: ctx.source_path.clone(),
        })
    }
}

impl Default for PolicyDispatcher {
    fn default() -> Self {
        Self::new(Box::new(Renderer::new()))
    }
}
