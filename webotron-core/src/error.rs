//! Error types for webotron-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from core validation and settings persistence.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, with the offending path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load; includes file path and line context from serde_yaml.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error (policy documents).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The name does not follow S3 bucket naming rules.
    #[error("invalid bucket name '{name}': {reason}")]
    InvalidBucketName { name: String, reason: &'static str },

    /// The name is not a usable DNS domain.
    #[error("invalid domain name '{0}'")]
    InvalidDomain(String),

    /// A settings value is out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// `dirs::home_dir()` returned `None`, so we cannot locate `~/.webotron/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
