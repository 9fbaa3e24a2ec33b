//! `merge`: fold the catalog copy into the project's file.

use tracing::{debug, info};

use super::{require_source, FileAction, PolicyHandler, ResolutionContext};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::manifest::Policy;
use crate::merge::{content_type_for, merge_content};

pub struct MergeHandler;

impl MergeHandler {
    /// Merged content, or `None` when it equals the current destination.
    fn merge(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<Option<String>> {
        let content_type = content_type_for(ctx.file, &ctx.destination_path);
        debug!(
            "merge ({}, {} priority): {} -> {}",
            content_type,
            ctx.file.merge_priority,
            ctx.source_path.display(),
            ctx.destination_path.display()
        );

        let incoming = fs.read_text(&ctx.source_path)?;
        let base = fs.read_text(&ctx.destination_path)?;
        let merged = merge_content(
            content_type,
            &base,
            &incoming,
            ctx.file.merge_priority,
            &ctx.destination_path,
        )?;

        Ok((merged != base).then_some(merged))
    }
}

impl PolicyHandler for MergeHandler {
    fn policy(&self) -> Policy {
        Policy::Merge
    }

    fn preview(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<FileAction> {
        if !ctx.destination_exists {
            require_source(ctx, fs)?;
            return Ok(FileAction::Copied);
        }

        Ok(match self.merge(ctx, fs)? {
            Some(_) => FileAction::Merged,
            None => FileAction::Unchanged,
        })
    }

    fn apply(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<FileAction> {
        if !ctx.destination_exists {
            info!(
                "merge: {} does not exist, copying {}",
                ctx.destination_path.display(),
                ctx.source_path.display()
            );
            fs.copy_bytes(&ctx.source_path, &ctx.destination_path)?;
            return Ok(FileAction::Copied);
        }

        match self.merge(ctx, fs)? {
            Some(merged) => {
                info!("merge: updating {}", ctx.destination_path.display());
                fs.write_text(&ctx.destination_path, &merged)?;
                Ok(FileAction::Merged)
            }
            None => {
                debug!("{} already up to date", ctx.destination_path.display());
                Ok(FileAction::Unchanged)
            }
        }
    }
}
