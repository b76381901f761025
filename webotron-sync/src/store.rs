//! The object store seam the sync engine talks to.
//!
//! `webotron-aws` implements [`ObjectStore`] for S3; tests use an in-memory
//! implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use webotron_core::{BucketName, Manifest, ObjectKey};

/// A failed object store request.
#[derive(Debug, Error)]
#[error("{operation} failed: {message}")]
pub struct StoreError {
    /// The API operation, e.g. `ListObjectsV2`.
    pub operation: &'static str,
    /// Human-readable cause, including any nested error context.
    pub message: String,
}

impl StoreError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// One file to put into the bucket. The body is streamed from `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub key: ObjectKey,
    pub path: PathBuf,
    pub size: u64,
    pub content_type: String,
}

/// Remote object storage as seen by the sync engine.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object in `bucket`, following pagination to the end,
    /// as key → ETag.
    async fn list_manifest(&self, bucket: &BucketName) -> Result<Manifest, StoreError>;

    /// Store `upload` in `bucket`, replacing any existing object at its key.
    ///
    /// Implementations must chunk large bodies with the same chunk size the
    /// fingerprints were computed with, or the next run re-uploads them.
    async fn upload(&self, bucket: &BucketName, upload: &Upload) -> Result<(), StoreError>;
}
