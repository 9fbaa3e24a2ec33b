//! The `tsync validate` command.
//!
//! Runs every structural and cross-manifest check and prints all findings.
//! Nothing in the project is touched.

use std::path::{Path, PathBuf};

use crate::cli::args::ValidateArgs;
use crate::error::Result;
use crate::manifest::{validate_against_catalog, validate_catalog, validate_manifest, ValidationError};
use crate::repository::CatalogRepository;
use crate::ui::UserInterface;

use super::dispatcher::{load_workspace, Command, CommandResult};

/// The validate command implementation.
pub struct ValidateCommand<'a> {
    project_root: PathBuf,
    repository: &'a dyn CatalogRepository,
    args: ValidateArgs,
}

impl<'a> ValidateCommand<'a> {
    /// Create a new validate command.
    pub fn new(
        project_root: &Path,
        repository: &'a dyn CatalogRepository,
        args: ValidateArgs,
    ) -> Self {
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
    pub fn args(&self) -> &ValidateArgs {
        &self.args
    }
}

fn location(finding: &ValidationError) -> String {
    match (&finding.bundle, &finding.component) {
        (Some(bundle), Some(component)) => format!(" ({}/{})", bundle, component),
        (Some(bundle), None) => format!(" ({})", bundle),
        (None, Some(component)) => format!(" ({})", component),
        (None, None) => String::new(),
    }
}

impl Command for ValidateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = match load_workspace(&self.project_root, self.repository, ui)? {
            Ok(workspace) => workspace,
            Err(result) => return Ok(result),
        };

        let mut findings = validate_catalog(&workspace.catalog);
        findings.extend(validate_manifest(&workspace.manifest));
        findings.extend(validate_against_catalog(
            &workspace.manifest,
            &workspace.catalog,
        ));

        let mut errors = 0;
        let mut warnings = 0;
        for finding in &findings {
            let line = format!("{}{}", finding, location(finding));
            if finding.is_error() {
                errors += 1;
                ui.error(&line);
            } else {
                warnings += 1;
                ui.warning(&line);
            }
        }

        if errors > 0 || (self.args.strict && warnings > 0) {
            ui.message(&format!(
                "\n{} error(s), {} warning(s)",
                errors, warnings
            ));
            return Ok(CommandResult::failure(1));
        }

        if warnings > 0 {
            ui.success(&format!("Manifests are valid ({} warning(s))", warnings));
        } else {
            ui.success("Manifests are valid");
        }
        Ok(CommandResult::success())
    }
}
