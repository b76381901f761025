//! Local file discovery.
//!
//! [`resolve_root`] validates the sync root; [`walk_files`] enumerates every
//! regular file beneath it. Discovery has no side effects, so the result can
//! be produced again or fed to any consumer.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use webotron_core::ObjectKey;

use crate::error::{io_err, SyncError};

/// A regular file found under the sync root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Remote key: the path relative to the root, `/`-separated.
    pub key: ObjectKey,
    pub size: u64,
}

/// Expand a leading `~`, then canonicalize `path` into an absolute,
/// symlink-free directory path.
pub fn resolve_root(path: &Path) -> Result<PathBuf, SyncError> {
    let expanded = expand_home(path);
    let resolved = expanded.canonicalize().map_err(|e| SyncError::Path {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !resolved.is_dir() {
        return Err(SyncError::Path {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    Ok(resolved)
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Recursively list the regular files under `root` (already resolved),
/// sorted by key.
///
/// Symlinks are followed; dangling links and entries that are neither
/// files nor directories are ignored. Any unreadable directory aborts the
/// walk.
pub fn walk_files(root: &Path) -> Result<Vec<LocalFile>, SyncError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_dangling_link(&e) => {
                if let Some(path) = e.path() {
                    tracing::warn!(path = %path.display(), "skipping dangling symlink");
                }
                continue;
            }
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                return Err(io_err(path, source));
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(key) = ObjectKey::from_paths(root, entry.path()) else {
            tracing::debug!(path = %entry.path().display(), "skipping path outside root");
            continue;
        };
        let size = entry
            .metadata()
            .map_err(|e| {
                io_err(
                    entry.path(),
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("metadata unavailable")),
                )
            })?
            .len();
        files.push(LocalFile {
            path: entry.path().to_path_buf(),
            key,
            size,
        });
    }
    files.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(files)
}

/// A symlink whose target does not exist.
fn is_dangling_link(e: &walkdir::Error) -> bool {
    let not_found = e
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
    not_found
        && e.path().is_some_and(|p| {
            p.symlink_metadata()
                .is_ok_and(|m| m.file_type().is_symlink())
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
