//! `sync-strict`: the catalog copy always wins.

use tracing::info;

use super::{require_source, FileAction, PolicyHandler, ResolutionContext};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::manifest::Policy;

pub struct SyncStrictHandler;

impl PolicyHandler for SyncStrictHandler {
    fn policy(&self) -> Policy {
        Policy::SyncStrict
    }

    fn preview(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<FileAction> {
        require_source(ctx, fs)?;
        Ok(FileAction::Copied)
    }

    fn apply(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<FileAction> {
        info!(
            "sync-strict: {} -> {}",
            ctx.source_path.display(),
            ctx.destination_path.display()
        );
        fs.copy_bytes(&ctx.source_path, &ctx.destination_path)?;
        Ok(FileAction::Copied)
    }
}
