//! User settings stored at `~/.webotron/config.yaml`.
//!
//! # API pattern
//!
//! Every function that touches disk has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! A missing file is not an error: every field has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};

/// S3's default multipart chunk size, and the chunk size fingerprints are
/// computed with.
pub const DEFAULT_CHUNK_SIZE: u64 = 8 * 1024 * 1024;

/// S3 rejects multipart parts smaller than this (except the last one).
pub const MIN_CHUNK_SIZE: u64 = 5 * 1024 * 1024;

pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_INDEX_DOCUMENT: &str = "index.html";
pub const DEFAULT_ERROR_DOCUMENT: &str = "error.html";

/// Tool-wide settings. Unset fields take their defaults on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Named AWS profile; `None` uses the default credential chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// AWS region; `None` uses the SDK region chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Fingerprint / multipart chunk size in bytes.
    pub chunk_size: u64,
    /// Files fingerprinted and uploaded at once during sync.
    pub concurrency: usize,
    pub index_document: String,
    pub error_document: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: None,
            region: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            index_document: DEFAULT_INDEX_DOCUMENT.to_string(),
            error_document: DEFAULT_ERROR_DOCUMENT.to_string(),
        }
    }
}

impl Settings {
    /// Reject values S3 or the sync engine cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.chunk_size < MIN_CHUNK_SIZE {
            return Err(CoreError::InvalidSettings(format!(
                "chunk_size must be at least {MIN_CHUNK_SIZE} bytes, got {}",
                self.chunk_size
            )));
        }
        if self.concurrency == 0 {
            return Err(CoreError::InvalidSettings(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.index_document.is_empty() || self.error_document.is_empty() {
            return Err(CoreError::InvalidSettings(
                "index_document and error_document must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.webotron/config.yaml`. Pure, no I/O.
pub fn settings_path_at(home: &Path) -> PathBuf {
    home.join(".webotron").join("config.yaml")
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load and validate settings from `<home>/.webotron/config.yaml`.
///
/// Returns defaults if the file does not exist.
pub fn load_at(home: &Path) -> Result<Settings, CoreError> {
    let path = settings_path_at(home);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    // An empty file deserializes to a YAML null, not an empty mapping.
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    let settings: Settings =
        serde_yaml::from_str(&contents).map_err(|e| CoreError::Parse { path, source: e })?;
    settings.validate()?;
    Ok(settings)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Settings, CoreError> {
    load_at(&home()?)
}

/// Atomically save settings to `<home>/.webotron/config.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, settings: &Settings) -> Result<PathBuf, CoreError> {
    settings.validate()?;
    let path = settings_path_at(home);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid settings path"),
        ));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let yaml = serde_yaml::to_string(settings)?;
    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(path)
}

/// `save_at` convenience wrapper.
pub fn save(settings: &Settings) -> Result<PathBuf, CoreError> {
    save_at(&home()?, settings)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, CoreError> {
    dirs::home_dir().ok_or(CoreError::HomeNotFound)
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}
