use std::path::PathBuf;

use thiserror::Error;

/// Provisioning and API failures. All are fatal to the calling command.
#[derive(Debug, Error)]
pub enum AwsError {
    /// An AWS API call failed.
    #[error("{operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },

    /// The response lacked a field the call cannot proceed without.
    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    /// No S3 website endpoint is known for the region.
    #[error("no S3 website endpoint known for region '{0}'")]
    UnknownRegion(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] webotron_core::CoreError),

    #[error(transparent)]
    Store(#[from] webotron_sync::StoreError),
}

/// Wrap an SDK error, keeping its full cause chain in the message.
pub(crate) fn api_err<E>(operation: &'static str) -> impl FnOnce(E) -> AwsError
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| AwsError::Api {
        operation,
        message: aws_sdk_s3::error::DisplayErrorContext(e).to_string(),
    }
}
