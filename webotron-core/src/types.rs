//! Domain types for webotron.
//!
//! Names that end up inside AWS requests are validated once, at construction,
//! so every downstream component can take them as given.

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Remote object key → remote content fingerprint (the S3 ETag, quotes
/// included). Built fresh for every sync run and never persisted.
pub type Manifest = HashMap<String, String>;

// ---------------------------------------------------------------------------
// BucketName
// ---------------------------------------------------------------------------

/// An S3 bucket name that satisfies the S3 naming rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BucketName(String);

impl BucketName {
    /// Validate `name` against the S3 bucket naming rules.
    pub fn parse(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        let invalid = |reason| CoreError::InvalidBucketName {
            name: name.clone(),
            reason,
        };

        if !(3..=63).contains(&name.len()) {
            return Err(invalid("must be between 3 and 63 characters long"));
        }
        if !name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'-')
        {
            return Err(invalid(
                "may only contain lowercase letters, digits, dots and hyphens",
            ));
        }
        let alnum = |b: Option<u8>| b.is_some_and(|b| b.is_ascii_alphanumeric());
        if !alnum(name.bytes().next()) || !alnum(name.bytes().last()) {
            return Err(invalid("must begin and end with a letter or digit"));
        }
        if name.contains("..") {
            return Err(invalid("must not contain two adjacent dots"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for BucketName {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<BucketName> for String {
    fn from(b: BucketName) -> Self {
        b.0
    }
}

impl std::str::FromStr for BucketName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// ObjectKey
// ---------------------------------------------------------------------------

/// A remote object key: a path relative to the sync root, joined with `/`
/// regardless of the host separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Build a key from `path` relative to `root`.
    ///
    /// Returns `None` when `path` is not under `root` or the relative part
    /// is empty or climbs out with `..`.
    pub fn from_paths(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        Self::from_relative(relative)
    }

    /// Build a key from an already-relative path.
    pub fn from_relative(relative: &Path) -> Option<Self> {
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if parts.is_empty() {
            return None;
        }
        Some(Self(parts.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ObjectKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// DomainName
// ---------------------------------------------------------------------------

/// A lowercase DNS name without the trailing root dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Parse a domain with at least two non-empty labels. A trailing dot is
    /// accepted and dropped.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        let normalized = name.trim().trim_end_matches('.').to_ascii_lowercase();
        let labels: Vec<&str> = normalized.split('.').collect();
        let valid_label = |l: &&str| {
            !l.is_empty()
                && l.len() <= 63
                && l.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'*')
        };
        if labels.len() < 2 || !labels.iter().all(valid_label) {
            return Err(CoreError::InvalidDomain(name.to_owned()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the hosted zone created for this domain: its last two labels
    /// plus the root dot (`www.shop.example.com` → `example.com.`).
    pub fn zone_name(&self) -> String {
        let labels: Vec<&str> = self.0.split('.').collect();
        let apex = &labels[labels.len().saturating_sub(2)..];
        format!("{}.", apex.join("."))
    }

    /// Whether this domain lives inside the hosted zone `zone`
    /// (`example.com.` contains both `example.com` and `a.example.com`).
    pub fn is_within_zone(&self, zone: &str) -> bool {
        let zone = zone.trim_end_matches('.').to_ascii_lowercase();
        if zone.is_empty() {
            return false;
        }
        self.0 == zone || self.0.ends_with(&format!(".{zone}"))
    }

    /// Whether a certificate subject-alternative-name covers this domain.
    ///
    /// Exact names match exactly; a name starting with `*` matches when the
    /// domain ends with the remainder after the `*`.
    pub fn matches_certificate_name(&self, san: &str) -> bool {
        let san = san.to_ascii_lowercase();
        if san == self.0 {
            return true;
        }
        match san.strip_prefix('*') {
            Some(suffix) => self.0.ends_with(suffix),
            None => false,
        }
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for DomainName {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<DomainName> for String {
    fn from(d: DomainName) -> Self {
        d.0
    }
}

impl std::str::FromStr for DomainName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
