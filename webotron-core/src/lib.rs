//! Webotron core library: domain types, bucket policy, settings, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes for buckets, keys and domains, plus [`Manifest`]
//! - [`policy`]: typed S3 bucket policy documents
//! - [`settings`]: `~/.webotron/config.yaml` load / save
//! - [`error`]: [`CoreError`]

pub mod error;
pub mod policy;
pub mod settings;
pub mod types;

pub use error::CoreError;
pub use policy::PolicyDocument;
pub use settings::Settings;
pub use types::{BucketName, DomainName, Manifest, ObjectKey};
