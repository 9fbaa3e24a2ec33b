//! `template`: render the source with the file's variables.

use tracing::info;

use super::{FileAction, PolicyHandler, ResolutionContext};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::manifest::Policy;
use crate::render::TemplateRenderer;

pub struct TemplateHandler {
    renderer: Box<dyn TemplateRenderer>,
}

impl TemplateHandler {
    pub fn new(renderer: Box<dyn TemplateRenderer>) -> Self {
        Self { renderer }
    }

    fn render(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<String> {
        let template = fs.read_text(&ctx.source_path)?;
        self.renderer.render(&template, &ctx.vars)
    }
}

impl PolicyHandler for TemplateHandler {
    fn policy(&self) -> Policy {
        Policy::Template
    }

    fn preview(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<FileAction> {
        self.render(ctx, fs)?;
        Ok(FileAction::Rendered)
    }

    fn apply(&self, ctx: &ResolutionContext<'_>, fs: &dyn FileSystem) -> Result<FileAction> {
        info!(
            "template: {} -> {}",
            ctx.source_path.display(),
            ctx.destination_path.display()
        );
        let rendered = self.render(ctx, fs)?;
        fs.write_text(&ctx.destination_path, &rendered)?;
        Ok(FileAction::Rendered)
    }
}
