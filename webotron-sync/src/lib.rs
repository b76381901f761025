//! # webotron-sync
//!
//! Incremental upload of a local directory tree to a bucket.
//!
//! A run lists the bucket once into a [`Manifest`](webotron_core::Manifest),
//! walks the local tree with [`walk_files`], fingerprints every file the way
//! S3 computes ETags ([`fingerprint`]) and uploads only files whose
//! fingerprint differs. [`SyncEngine`] drives the run against any
//! [`ObjectStore`].

pub mod content_type;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod store;
pub mod walker;

pub use content_type::content_type_for;
pub use engine::{FileOutcome, SyncEngine, SyncOptions, SyncReport};
pub use error::SyncError;
pub use fingerprint::{fingerprint_file, fingerprint_reader, Fingerprint};
pub use store::{ObjectStore, StoreError, Upload};
pub use tokio_util::sync::CancellationToken;
pub use walker::{resolve_root, walk_files, LocalFile};
