//! # webotron-aws
//!
//! AWS-backed collaborators for webotron: the S3 object store used by the
//! sync engine, bucket provisioning, Route 53 records and ACM certificate
//! lookup. Every manager is built from one shared [`SdkConfig`] handle.

pub mod bucket;
pub mod certificate;
pub mod config;
pub mod domain;
pub mod endpoints;
mod error;
pub mod store;

pub use aws_config::SdkConfig;
pub use bucket::BucketManager;
pub use certificate::{Certificate, CertificateManager};
pub use config::load_sdk_config;
pub use domain::{DomainManager, HostedZone};
pub use endpoints::{website_endpoint, WebsiteEndpoint};
pub use error::AwsError;
pub use store::S3Store;
