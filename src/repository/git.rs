//! Git-backed catalog cache.
//!
//! Each catalog URL gets one clone under the cache directory. Later runs
//! fetch into the existing clone and check out the requested branch, tag or
//! commit as a detached HEAD.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::CatalogRepository;
use crate::error::{Result, TsyncError};

/// SSH settings that never wait for a password or host-key prompt.
const NON_INTERACTIVE_SSH: &str = "ssh -o BatchMode=yes -o StrictHostKeyChecking=accept-new";

/// Clones catalog repositories into a local cache.
#[derive(Debug, Clone)]
pub struct GitRepository {
    cache_dir: PathBuf,
}

impl GitRepository {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Local clone path for a repository URL.
    ///
    /// Uses a hash of the URL to create a deterministic, unique path.
    pub fn repo_path(&self, url: &str) -> PathBuf {
        let hash = Sha256::digest(url.as_bytes());
        self.cache_dir.join(hex::encode(&hash[..8]))
    }

    fn checkout(&self, url: &str, version: &str) -> anyhow::Result<PathBuf> {
        let repo_path = self.repo_path(url);

        if repo_path.join(".git").exists() {
            info!("Updating catalog cache {}", repo_path.display());
            run_git(
                &["fetch", "--all", "--prune", "--tags", "--force"],
                &repo_path,
            )?;
        } else {
            info!("Cloning {} into {}", url, repo_path.display());
            std::fs::create_dir_all(&self.cache_dir).with_context(|| {
                format!("Failed to create cache directory {}", self.cache_dir.display())
            })?;
            let target = repo_path.to_string_lossy();
            run_git(&["clone", "--quiet", url, target.as_ref()], &self.cache_dir)?;
        }

        let remote_branch = format!("refs/remotes/origin/{}", version);
        let target = if git_succeeds(&["rev-parse", "--verify", "--quiet", &remote_branch], &repo_path)
        {
            remote_branch
        } else {
            format!("{}^{{commit}}", version)
        };

        info!("Checking out '{}'", version);
        run_git(&["checkout", "--quiet", "--force", "--detach", &target], &repo_path)?;

        let head = run_git(&["rev-parse", "HEAD"], &repo_path)?;
        debug!("Catalog at {}", head.trim());

        Ok(repo_path)
    }
}

impl CatalogRepository for GitRepository {
    fn resolve_version(&self, url: &str, version: &str) -> Result<PathBuf> {
        self.checkout(url, version)
            .map_err(|e| TsyncError::Repository {
                url: url.to_string(),
                message: format!("{:#}", e),
            })
    }
}

fn git_command(args: &[&str], cwd: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.args(args)
        .current_dir(cwd)
        .env("GIT_TERMINAL_PROMPT", "0");
    if std::env::var_os("GIT_SSH_COMMAND").is_none() {
        cmd.env("GIT_SSH_COMMAND", NON_INTERACTIVE_SSH);
    }
    cmd
}

/// Run git and return its stdout.
fn run_git(args: &[&str], cwd: &Path) -> anyhow::Result<String> {
    debug!("git {}", args.join(" "));
    let output = git_command(args, cwd)
        .output()
        .context("Failed to run git; is it installed?")?;

    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.first().copied().unwrap_or_default(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn git_succeeds(args: &[&str], cwd: &Path) -> bool {
    git_command(args, cwd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
