//! The `tsync list` command.
//!
//! Shows what the project's catalog offers: bundles, their variants and
//! components.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::manifest::{Bundle, ProviderCatalog};
use crate::repository::CatalogRepository;
use crate::ui::{TsyncTheme, UserInterface};

use super::dispatcher::{load_workspace, Command, CommandResult};

/// The list command implementation.
pub struct ListCommand<'a> {
    project_root: PathBuf,
    repository: &'a dyn CatalogRepository,
    args: ListArgs,
}

#[derive(Debug, Serialize)]
struct BundleListing<'a> {
    name: &'a str,
    description: &'a str,
    variants: Vec<&'a str>,
    components: Vec<ComponentListing<'a>>,
}

#[derive(Debug, Serialize)]
struct ComponentListing<'a> {
    id: &'a str,
    description: &'a str,
    files: usize,
}

impl<'a> BundleListing<'a> {
    fn new(name: &'a str, bundle: &'a Bundle) -> Self {
        Self {
            name,
            description: &bundle.description,
            variants: bundle.variants.keys().map(String::as_str).collect(),
            components: bundle
                .components
                .iter()
                .map(|c| ComponentListing {
                    id: &c.id,
                    description: &c.description,
                    files: c.files.len(),
                })
                .collect(),
        }
    }
}

fn listings(catalog: &ProviderCatalog) -> Vec<BundleListing<'_>> {
    catalog
        .bundles
        .iter()
        .map(|(name, bundle)| BundleListing::new(name, bundle))
        .collect()
}

impl<'a> ListCommand<'a> {
    /// Create a new list command.
    pub fn new(project_root: &Path, repository: &'a dyn CatalogRepository, args: ListArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            repository,
            args,
        }
    }

    /// Get the project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }
}

impl Command for ListCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = match load_workspace(&self.project_root, self.repository, ui)? {
            Ok(workspace) => workspace,
            Err(result) => return Ok(result),
        };
        let bundles = listings(&workspace.catalog);

        if self.args.json {
            let json = serde_json::to_string_pretty(&bundles).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let theme = TsyncTheme::detect();
        ui.show_header(&format!("Catalog {}", workspace.catalog.version));

        if bundles.is_empty() {
            ui.message("No bundles defined.");
            return Ok(CommandResult::success());
        }

        for bundle in &bundles {
            if bundle.description.is_empty() {
                ui.message(&format!("{}", theme.key.apply_to(bundle.name)));
            } else {
                ui.message(&format!(
                    "{}  {}",
                    theme.key.apply_to(bundle.name),
                    theme.dim.apply_to(bundle.description)
                ));
            }
            if !bundle.variants.is_empty() {
                ui.message(&format!("  variants: {}", bundle.variants.join(", ")));
            }
            for component in &bundle.components {
                ui.message(&format!(
                    "  - {} ({} file(s))",
                    component.id, component.files
                ));
            }
        }

        Ok(CommandResult::success())
    }
}
