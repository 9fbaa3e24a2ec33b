//! `init`: copy once, then leave the project's edits alone.

use tracing::info;

use super::{require_source, FileAction, PolicyHandler, ResolutionContext};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::manifest::Policy;

pub struct InitHandler;

impl PolicyHandler for InitHandler {
    fn policy(&self) -> Policy {
        Policy::Init
    }

    fn preview(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<FileAction> {
        if ctx.destination_exists {
            return Ok(FileAction::Preserved);
        }
        require_source(ctx, fs)?;
        Ok(FileAction::Copied)
    }

    fn apply(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<FileAction> {
        if ctx.destination_exists {
            info!(
                "init: {} already exists, keeping it",
                ctx.destination_path.display()
            );
            return Ok(FileAction::Preserved);
        }

        info!(
            "init: {} -> {}",
            ctx.source_path.display(),
            ctx.destination_path.display()
        );
        fs.copy_bytes(&ctx.source_path, &ctx.destination_path)?;
        Ok(FileAction::Copied)
    }
}
