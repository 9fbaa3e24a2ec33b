//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, SyncArgs};
use crate::error::{Result, TsyncError};
use crate::repository::CatalogRepository;
use crate::sync::Workspace;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Load the workspace, reporting a missing manifest as exit code 2.
///
/// Returns `Ok(Err(result))` when the command should stop with `result`.
pub(crate) fn load_workspace(
    project_root: &Path,
    repository: &dyn CatalogRepository,
    ui: &mut dyn UserInterface,
) -> Result<std::result::Result<Workspace, CommandResult>> {
    match Workspace::load(project_root, repository) {
        Ok(workspace) => Ok(Ok(workspace)),
        Err(TsyncError::ManifestNotFound { path }) => {
            ui.error(&format!("Manifest not found: {}", path.display()));
            Ok(Err(CommandResult::failure(2)))
        }
        Err(e) => Err(e),
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    repository: Box<dyn CatalogRepository>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root and catalog source.
    pub fn new(project_root: PathBuf, repository: Box<dyn CatalogRepository>) -> Self {
        Self {
            project_root,
            repository,
        }
    }

    /// Build a dispatcher from the global flags.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(cli.project_root(), cli.repository())
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let repository = self.repository.as_ref();
        match &cli.command {
            Some(Commands::Sync(args)) => {
                let cmd = super::sync::SyncCommand::new(&self.project_root, repository, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Validate(args)) => {
                let cmd = super::validate::ValidateCommand::new(
                    &self.project_root,
                    repository,
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Some(Commands::List(args)) => {
                let cmd = super::list::ListCommand::new(&self.project_root, repository, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                // Default to sync with default args
                let cmd =
                    super::sync::SyncCommand::new(&self.project_root, repository, SyncArgs::default());
                cmd.execute(ui)
            }
        }
    }
}
