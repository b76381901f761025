//! Error types for webotron-sync.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Fatal errors that stop a sync run before or during discovery.
///
/// Per-file upload failures are not errors at this level; they are
/// recorded in the [`SyncReport`](crate::SyncReport).
#[derive(Debug, Error)]
pub enum SyncError {
    /// The sync root is missing or is not a directory.
    #[error("invalid sync root {path}: {reason}")]
    Path { path: PathBuf, reason: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The object store could not produce the remote manifest.
    #[error("object store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
