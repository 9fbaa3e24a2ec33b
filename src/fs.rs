//! File-system access for the sync engine.
//!
//! Every read and write the policies make goes through [`FileSystem`], so
//! the engine can be driven against a scratch directory in tests.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TsyncError};

/// File operations the policies need.
pub trait FileSystem {
    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read a UTF-8 file.
    ///
    /// Fails with `NotFound` if it doesn't exist and `Read` otherwise.
    fn read_text(&self, path: &Path) -> Result<String>;

    /// Write a UTF-8 file, creating parent directories as needed.
    fn write_text(&self, path: &Path, content: &str) -> Result<()>;

    /// Copy raw bytes from `source` to `destination`, creating parent
    /// directories as needed. Fails with `NotFound` if `source` is missing.
    fn copy_bytes(&self, source: &Path, destination: &Path) -> Result<()>;

    /// Fail with `PathTraversal` unless `path` resolves inside `root`.
    ///
    /// `..` segments and symbolic links, dangling ones included, are followed
    /// before comparing. The path must be strictly inside; the root itself is
    /// rejected.
    fn ensure_contained(&self, path: &Path, root: &Path) -> Result<()>;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|source| TsyncError::Write {
                    path: parent.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| read_error(path, e))
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        Self::ensure_parent(path)?;
        fs::write(path, content).map_err(|source| TsyncError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn copy_bytes(&self, source: &Path, destination: &Path) -> Result<()> {
        let bytes = fs::read(source).map_err(|e| read_error(source, e))?;
        Self::ensure_parent(destination)?;
        fs::write(destination, bytes).map_err(|source| TsyncError::Write {
            path: destination.to_path_buf(),
            source,
        })?;
        debug!("Copied {} -> {}", source.display(), destination.display());
        Ok(())
    }

    fn ensure_contained(&self, path: &Path, root: &Path) -> Result<()> {
        let resolved = resolve_lenient(path)?;
        let resolved_root = resolve_lenient(root)?;

        if resolved.starts_with(&resolved_root) && resolved != resolved_root {
            Ok(())
        } else {
            Err(TsyncError::PathTraversal {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })
        }
    }
}

fn read_error(path: &Path, e: io::Error) -> TsyncError {
    if e.kind() == io::ErrorKind::NotFound {
        TsyncError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        TsyncError::Read {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

const MAX_LINK_HOPS: usize = 40;

/// Resolve `path` to an absolute path without requiring it to exist.
///
/// Every symbolic link met along the way is expanded, whether or not its
/// target exists, so a dangling link can't hide where a write would land.
pub fn resolve_lenient(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut pending = reversed_components(&absolute);
    let mut resolved = PathBuf::new();
    let mut hops = 0;

    while let Some(next) = pending.pop() {
        let Some(component) = next.components().next() else {
            continue;
        };
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::Normal(part) => {
                resolved.push(part);
                let is_link = fs::symlink_metadata(&resolved)
                    .map(|meta| meta.file_type().is_symlink())
                    .unwrap_or(false);
                if !is_link {
                    continue;
                }

                hops += 1;
                if hops > MAX_LINK_HOPS {
                    return Err(io::Error::other(format!(
                        "too many levels of symbolic links resolving {}",
                        path.display()
                    ))
                    .into());
                }

                let target = fs::read_link(&resolved)?;
                debug!("Following link {} -> {}", resolved.display(), target.display());
                resolved.pop();
                pending.extend(reversed_components(&target));
            }
        }
    }

    Ok(resolved)
}

fn reversed_components(path: &Path) -> Vec<PathBuf> {
    path.components()
        .rev()
        .map(|c| PathBuf::from(c.as_os_str()))
        .collect()
}
