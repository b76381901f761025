//! Content fingerprints that reproduce S3 ETags.
//!
//! S3 reports the ETag of a single-part upload as the quoted MD5 of the
//! body, and of a multipart upload as the quoted MD5 of the concatenated
//! binary part digests followed by `-<part count>`. Hashing a local file in
//! chunks of the multipart part size yields the same string, so the two can
//! be compared directly.
//!
//! An empty input hashes zero chunks and has no fingerprint.

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Bytes read per `read` call inside a chunk.
const READ_BUF_SIZE: usize = 64 * 1024;

/// A quoted, S3-compatible ETag string such as `"5d41…"` or `"9b2c…-3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the multipart (`…-N`) form.
    pub fn is_multipart(&self) -> bool {
        self.part_count() > 1
    }

    /// Number of chunks hashed: the `-N` suffix, or 1 for the single-chunk form.
    pub fn part_count(&self) -> usize {
        self.0
            .trim_matches('"')
            .rsplit_once('-')
            .and_then(|(_, n)| n.parse().ok())
            .unwrap_or(1)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq<str> for Fingerprint {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<String> for Fingerprint {
    fn eq(&self, other: &String) -> bool {
        &self.0 == other
    }
}

/// Fingerprint everything `reader` yields, hashing `chunk_size` bytes per chunk.
///
/// Returns `Ok(None)` for empty input, and `InvalidInput` for a zero
/// `chunk_size`.
pub fn fingerprint_reader<R: Read>(
    mut reader: R,
    chunk_size: u64,
) -> std::io::Result<Option<Fingerprint>> {
    if chunk_size == 0 {
        return Err(std::io::Error::new(
            ErrorKind::InvalidInput,
            "chunk_size must be non-zero",
        ));
    }

    let mut buf = vec![0u8; READ_BUF_SIZE];
    let mut digests: Vec<md5::Digest> = Vec::new();

    loop {
        let mut chunk = md5::Context::new();
        let mut chunk_len: u64 = 0;
        while chunk_len < chunk_size {
            let want = (chunk_size - chunk_len).min(buf.len() as u64) as usize;
            let n = match reader.read(&mut buf[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            chunk.consume(&buf[..n]);
            chunk_len += n as u64;
        }
        if chunk_len == 0 {
            break;
        }
        digests.push(chunk.compute());
        if chunk_len < chunk_size {
            break;
        }
    }

    Ok(match digests.as_slice() {
        [] => None,
        [single] => Some(Fingerprint(format!("\"{}\"", hex::encode(single.0)))),
        parts => {
            let mut combined = md5::Context::new();
            for digest in parts {
                combined.consume(digest.0);
            }
            Some(Fingerprint(format!(
                "\"{}-{}\"",
                hex::encode(combined.compute().0),
                parts.len()
            )))
        }
    })
}

/// Fingerprint the file at `path`. Blocking; run it off the async executor.
pub fn fingerprint_file(path: &Path, chunk_size: u64) -> std::io::Result<Option<Fingerprint>> {
    let file = File::open(path)?;
    fingerprint_reader(file, chunk_size)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
