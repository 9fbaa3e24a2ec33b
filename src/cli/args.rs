//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::repository::{CatalogRepository, GitRepository, LocalRepository};

/// tsync - Keep projects in step with a shared toolkit catalog.
#[derive(Debug, Parser)]
#[command(name = "tsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true, env = "TSYNC_PROJECT_DIR")]
    pub project: Option<PathBuf>,

    /// Where catalog repositories are cloned (default: ~/.tsync/cache)
    #[arg(long, global = true, env = "TSYNC_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Use an already checked-out catalog instead of cloning the provider URL
    #[arg(long, global = true, env = "TSYNC_TOOLKIT_DIR", value_name = "DIR")]
    pub toolkit_dir: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Project root from `--project`, falling back to the current directory.
    pub fn project_root(&self) -> PathBuf {
        self.project
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
    }

    /// Cache directory from `--cache-dir`, falling back to `~/.tsync/cache`.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }

    /// Repository the catalog is resolved through.
    pub fn repository(&self) -> Box<dyn CatalogRepository> {
        match &self.toolkit_dir {
            Some(dir) => Box::new(LocalRepository::new(dir)),
            None => Box::new(GitRepository::new(self.cache_dir())),
        }
    }
}

/// `~/.tsync/cache`, or a directory under the system temp dir without a home.
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".tsync"))
        .unwrap_or_else(|| std::env::temp_dir().join("tsync"))
        .join("cache")
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Synchronize toolkit files into the project (default if no command specified)
    Sync(SyncArgs),

    /// Validate both manifests without touching any file
    Validate(ValidateArgs),

    /// List bundles, variants and components offered by the catalog
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `sync` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SyncArgs {
    /// Resolve every file and report what would happen without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Output the sync report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ValidateArgs {
    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["tsync"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn sync_flags_parse() {
        let cli = Cli::try_parse_from(["tsync", "sync", "--dry-run", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Sync(args)) => {
                assert!(args.dry_run);
                assert!(args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["tsync", "list", "--toolkit-dir", "/tk", "-p", "/proj", "-q"])
                .unwrap();
        assert_eq!(cli.toolkit_dir, Some(PathBuf::from("/tk")));
        assert_eq!(cli.project_root(), PathBuf::from("/proj"));
        assert!(cli.quiet);
    }

    #[test]
    fn explicit_cache_dir_wins() {
        let cli = Cli::try_parse_from(["tsync", "--cache-dir", "/c"]).unwrap();
        assert_eq!(cli.cache_dir(), PathBuf::from("/c"));
    }

    #[test]
    fn default_cache_dir_ends_in_cache() {
        let dir = default_cache_dir();
        assert!(dir.ends_with("tsync/cache") || dir.ends_with(".tsync/cache"));
    }

    #[test]
    fn completions_requires_shell() {
        assert!(Cli::try_parse_from(["tsync", "completions"]).is_err());
        assert!(Cli::try_parse_from(["tsync", "completions", "bash"]).is_ok());
    }
}
