//! Sync orchestration.
//!
//! ## `SyncEngine::run`
//!
//! 1. Resolve the root to an absolute, symlink-free directory.
//! 2. List the bucket into a [`Manifest`] (every page).
//! 3. Walk the root for regular files.
//! 4. For each file, at most `concurrency` at a time: fingerprint it,
//!    compare with the manifest entry for its key, upload on mismatch.
//! 5. Join, then summarize every per-file outcome in a [`SyncReport`].
//!
//! The manifest is read-only once listed. A failed upload is recorded and
//! never stops other files. Remote objects with no local file are left alone.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use webotron_core::{settings::Settings, BucketName, Manifest, ObjectKey};

use crate::content_type::content_type_for;
use crate::error::SyncError;
use crate::fingerprint::{fingerprint_file, Fingerprint};
use crate::store::{ObjectStore, Upload};
use crate::walker::{resolve_root, walk_files, LocalFile};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunables for a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Must equal the store's multipart chunk size for fingerprints to match.
    pub chunk_size: u64,
    pub concurrency: usize,
    /// Fingerprint and compare, but never upload.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SyncOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            concurrency: settings.concurrency,
            dry_run: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to one local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Fingerprint differed or key was new; the file was uploaded.
    Uploaded { key: ObjectKey },
    /// Fingerprint matched the remote ETag.
    Skipped { key: ObjectKey },
    /// `--dry-run`: the file *would* have been uploaded.
    WouldUpload { key: ObjectKey },
    /// The upload was attempted and failed.
    Failed { key: ObjectKey, error: String },
    /// Cancellation arrived before this file was started.
    Cancelled { key: ObjectKey },
}

impl FileOutcome {
    pub fn key(&self) -> &ObjectKey {
        match self {
            FileOutcome::Uploaded { key }
            | FileOutcome::Skipped { key }
            | FileOutcome::WouldUpload { key }
            | FileOutcome::Failed { key, .. }
            | FileOutcome::Cancelled { key } => key,
        }
    }
}

/// Summary of a finished sync run, outcomes sorted by key.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub bucket: BucketName,
    pub root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<FileOutcome>,
}

impl SyncReport {
    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(*o)).count()
    }

    pub fn uploaded_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Uploaded { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn would_upload_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::WouldUpload { .. }))
    }

    pub fn cancelled_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Cancelled { .. }))
    }

    /// `(uploaded, skipped)`.
    pub fn counts(&self) -> (usize, usize) {
        (self.uploaded_count(), self.skipped_count())
    }

    /// `(key, error)` for every failed upload.
    pub fn failures(&self) -> Vec<(&ObjectKey, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed { key, error } => Some((key, error.as_str())),
                _ => None,
            })
            .collect()
    }

    /// No file failed and none was cancelled.
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| !matches!(o, FileOutcome::Failed { .. } | FileOutcome::Cancelled { .. }))
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Incremental one-way sync from a local directory into a bucket.
#[derive(Clone)]
pub struct SyncEngine {
    store: Arc<dyn ObjectStore>,
    options: SyncOptions,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn ObjectStore>, options: SyncOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Sync `root` into `bucket`.
    ///
    /// Fails only when the root is invalid, the manifest cannot be listed or
    /// the walk hits an unreadable directory. Per-file problems end up in the
    /// report.
    pub async fn run(
        &self,
        root: &Path,
        bucket: &BucketName,
        cancel: &CancellationToken,
    ) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();
        let root = resolve_root(root)?;

        let manifest = Arc::new(self.store.list_manifest(bucket).await?);
        tracing::info!(bucket = %bucket, objects = manifest.len(), "loaded remote manifest");

        let files = walk_files(&root)?;
        tracing::info!(root = %root.display(), files = files.len(), "discovered local files");

        let outcomes = self.process_files(files, bucket, manifest, cancel).await;
        Ok(SyncReport {
            bucket: bucket.clone(),
            root,
            started_at,
            outcomes,
        })
    }

    /// Consume `files` with bounded concurrency and return sorted outcomes.
    pub async fn process_files(
        &self,
        files: Vec<LocalFile>,
        bucket: &BucketName,
        manifest: Arc<Manifest>,
        cancel: &CancellationToken,
    ) -> Vec<FileOutcome> {
        let concurrency = self.options.concurrency.max(1);
        let mut outcomes: Vec<FileOutcome> = stream::iter(files)
            .map(|file| {
                let manifest = Arc::clone(&manifest);
                async move {
                    if cancel.is_cancelled() {
                        return FileOutcome::Cancelled { key: file.key };
                    }
                    self.process_file(file, bucket, &manifest).await
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;
        outcomes.sort_by(|a, b| a.key().cmp(b.key()));
        outcomes
    }

    async fn process_file(
        &self,
        file: LocalFile,
        bucket: &BucketName,
        manifest: &Manifest,
    ) -> FileOutcome {
        let local = self.fingerprint(&file).await;
        let remote = manifest.get(file.key.as_str());

        if let (Some(local), Some(remote)) = (&local, remote) {
            if local == remote {
                tracing::debug!(key = %file.key, etag = %local, "skipping, etags match");
                return FileOutcome::Skipped { key: file.key };
            }
        }

        if self.options.dry_run {
            tracing::info!(key = %file.key, "[dry-run] would upload");
            return FileOutcome::WouldUpload { key: file.key };
        }

        let upload = Upload {
            content_type: content_type_for(file.key.as_str()),
            key: file.key,
            path: file.path,
            size: file.size,
        };
        tracing::info!(key = %upload.key, content_type = %upload.content_type, "uploading");
        match self.store.upload(bucket, &upload).await {
            Ok(()) => FileOutcome::Uploaded { key: upload.key },
            Err(e) => {
                tracing::warn!(key = %upload.key, error = %e, "upload failed");
                FileOutcome::Failed {
                    key: upload.key,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Fingerprint on the blocking pool. Any failure yields `None`, which
    /// never equals a manifest entry, so the file is uploaded.
    async fn fingerprint(&self, file: &LocalFile) -> Option<Fingerprint> {
        let path = file.path.clone();
        let chunk_size = self.options.chunk_size;
        match tokio::task::spawn_blocking(move || fingerprint_file(&path, chunk_size)).await {
            Ok(Ok(fp)) => fp,
            Ok(Err(e)) => {
                tracing::warn!(key = %file.key, error = %e, "could not fingerprint, will upload");
                None
            }
            Err(e) => {
                tracing::warn!(key = %file.key, error = %e, "fingerprint task failed, will upload");
                None
            }
        }
    }
}
