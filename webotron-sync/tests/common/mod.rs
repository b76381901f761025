//! In-memory `ObjectStore` for engine tests.

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use webotron_core::{BucketName, Manifest};
use webotron_sync::{fingerprint_reader, ObjectStore, StoreError, Upload};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Bucket contents keyed by object key. ETags are derived with `chunk_size`,
/// the way S3 derives them from the multipart part size. Listing returns
/// `page_size` keys per page, in key order.
pub struct MemoryStore {
    pub chunk_size: u64,
    pub page_size: usize,
    pub list_pages: AtomicUsize,
    pub objects: Mutex<HashMap<String, StoredObject>>,
    pub fail_keys: HashSet<String>,
    pub list_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub fail_listing: bool,
}

impl MemoryStore {
    pub fn new(chunk_size: u64) -> Self {
        Self {
            chunk_size,
            page_size: 1000,
            list_pages: AtomicUsize::new(0),
            objects: Mutex::new(HashMap::new()),
            fail_keys: HashSet::new(),
            list_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            fail_listing: false,
        }
    }

    pub fn put(&self, key: &str, body: &[u8]) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body: body.to_vec(),
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn uploads(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_manifest(&self, _bucket: &BucketName) -> Result<Manifest, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(StoreError::new("ListObjectsV2", "access denied"));
        }
        let objects = self.objects.lock().unwrap();
        let mut keys: Vec<&String> = objects.keys().collect();
        keys.sort();
        let mut manifest = Manifest::new();
        for page in keys.chunks(self.page_size.max(1)) {
            self.list_pages.fetch_add(1, Ordering::SeqCst);
            for key in page {
                // S3 reports an empty object's ETag as the MD5 of zero bytes.
                let etag = fingerprint_reader(Cursor::new(&objects[*key].body), self.chunk_size)
                    .unwrap()
                    .map(|fp| fp.to_string())
                    .unwrap_or_else(|| "\"d41d8cd98f00b204e9800998ecf8427e\"".to_string());
                manifest.insert((*key).clone(), etag);
            }
        }
        Ok(manifest)
    }

    async fn upload(&self, _bucket: &BucketName, upload: &Upload) -> Result<(), StoreError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_keys.contains(upload.key.as_str()) {
            return Err(StoreError::new("PutObject", "simulated failure"));
        }
        let body = std::fs::read(&upload.path)
            .map_err(|e| StoreError::new("PutObject", e.to_string()))?;
        self.objects.lock().unwrap().insert(
            upload.key.to_string(),
            StoredObject {
                body,
                content_type: upload.content_type.clone(),
            },
        );
        Ok(())
    }
}

pub fn bucket() -> BucketName {
    BucketName::parse("test-site").unwrap()
}
