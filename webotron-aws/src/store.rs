//! S3 implementation of the sync engine's [`ObjectStore`].
//!
//! Uploads are chunk-aligned: a body of at most `chunk_size` bytes goes up
//! with one `PutObject`, anything larger as a multipart upload whose parts
//! are exactly `chunk_size` bytes (the last one shorter). S3 then reports the
//! same ETag that [`webotron_sync::fingerprint_file`] computes locally.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use tokio::io::AsyncReadExt;
use webotron_core::{BucketName, Manifest};
use webotron_sync::{ObjectStore, StoreError, Upload};

use crate::error::{api_err, AwsError};

/// One object as listed by `ListObjectsV2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub key: String,
    pub etag: Option<String>,
    pub size: i64,
}

/// Byte range of one multipart part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSpec {
    /// 1-based, as S3 numbers parts.
    pub number: i32,
    pub offset: u64,
    pub len: u64,
}

/// Split `size` bytes into `chunk_size` parts. Empty for `size == 0`.
pub fn plan_parts(size: u64, chunk_size: u64) -> Vec<PartSpec> {
    let mut parts = Vec::new();
    let mut offset = 0;
    let mut number = 1;
    while offset < size {
        let len = chunk_size.min(size - offset);
        parts.push(PartSpec {
            number,
            offset,
            len,
        });
        offset += len;
        number += 1;
    }
    parts
}

/// S3 access for listing and uploading objects.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    chunk_size: u64,
}

impl S3Store {
    pub fn new(config: &SdkConfig, chunk_size: u64) -> Self {
        Self {
            client: Client::new(config),
            chunk_size,
        }
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Every object in `bucket`, across all result pages.
    pub async fn list_objects(&self, bucket: &BucketName) -> Result<Vec<RemoteObject>, AwsError> {
        let mut objects = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket.as_str())
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(api_err("ListObjectsV2"))?;
            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                objects.push(RemoteObject {
                    key: key.to_owned(),
                    etag: object.e_tag().map(str::to_owned),
                    size: object.size().unwrap_or_default(),
                });
            }
        }
        tracing::debug!(bucket = %bucket, count = objects.len(), "listed objects");
        Ok(objects)
    }

    /// Upload one file, choosing single or multipart by size.
    pub async fn upload_file(&self, bucket: &BucketName, upload: &Upload) -> Result<(), AwsError> {
        if upload.size <= self.chunk_size {
            self.put_single(bucket, upload).await
        } else {
            self.put_multipart(bucket, upload).await
        }
    }

    async fn put_single(&self, bucket: &BucketName, upload: &Upload) -> Result<(), AwsError> {
        let body = ByteStream::from_path(&upload.path)
            .await
            .map_err(api_err("PutObject"))?;
        self.client
            .put_object()
            .bucket(bucket.as_str())
            .key(upload.key.as_str())
            .content_type(&upload.content_type)
            .body(body)
            .send()
            .await
            .map_err(api_err("PutObject"))?;
        tracing::debug!(key = %upload.key, bytes = upload.size, "put object");
        Ok(())
    }

    async fn put_multipart(&self, bucket: &BucketName, upload: &Upload) -> Result<(), AwsError> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(bucket.as_str())
            .key(upload.key.as_str())
            .content_type(&upload.content_type)
            .send()
            .await
            .map_err(api_err("CreateMultipartUpload"))?;
        let upload_id = created
            .upload_id()
            .ok_or(AwsError::MissingField {
                operation: "CreateMultipartUpload",
                field: "UploadId",
            })?
            .to_owned();

        let parts = match self.upload_parts(bucket, upload, &upload_id).await {
            Ok(parts) => parts,
            Err(e) => {
                self.abort_multipart(bucket, upload, &upload_id).await;
                return Err(e);
            }
        };

        let completed = self
            .client
            .complete_multipart_upload()
            .bucket(bucket.as_str())
            .key(upload.key.as_str())
            .upload_id(&upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .send()
            .await;
        if let Err(e) = completed {
            self.abort_multipart(bucket, upload, &upload_id).await;
            return Err(api_err("CompleteMultipartUpload")(e));
        }
        tracing::debug!(key = %upload.key, bytes = upload.size, "completed multipart upload");
        Ok(())
    }

    async fn upload_parts(
        &self,
        bucket: &BucketName,
        upload: &Upload,
        upload_id: &str,
    ) -> Result<Vec<CompletedPart>, AwsError> {
        let io = |source: std::io::Error| AwsError::Io {
            path: upload.path.clone(),
            source,
        };
        let mut file = tokio::fs::File::open(&upload.path).await.map_err(io)?;
        let mut completed = Vec::new();

        for part in plan_parts(upload.size, self.chunk_size) {
            let mut buf = vec![0u8; part.len as usize];
            file.read_exact(&mut buf).await.map_err(io)?;
            let output = self
                .client
                .upload_part()
                .bucket(bucket.as_str())
                .key(upload.key.as_str())
                .upload_id(upload_id)
                .part_number(part.number)
                .body(ByteStream::from(buf))
                .send()
                .await
                .map_err(api_err("UploadPart"))?;
            let etag = output.e_tag().ok_or(AwsError::MissingField {
                operation: "UploadPart",
                field: "ETag",
            })?;
            tracing::trace!(key = %upload.key, part = part.number, "uploaded part");
            completed.push(
                CompletedPart::builder()
                    .e_tag(etag)
                    .part_number(part.number)
                    .build(),
            );
        }
        Ok(completed)
    }

    async fn abort_multipart(&self, bucket: &BucketName, upload: &Upload, upload_id: &str) {
        let aborted = self
            .client
            .abort_multipart_upload()
            .bucket(bucket.as_str())
            .key(upload.key.as_str())
            .upload_id(upload_id)
            .send()
            .await;
        if let Err(e) = aborted {
            tracing::warn!(
                key = %upload.key,
                upload_id,
                error = %aws_sdk_s3::error::DisplayErrorContext(e),
                "could not abort multipart upload"
            );
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_manifest(&self, bucket: &BucketName) -> Result<Manifest, StoreError> {
        let objects = self
            .list_objects(bucket)
            .await
            .map_err(|e| StoreError::new("ListObjectsV2", e.to_string()))?;
        Ok(objects
            .into_iter()
            .filter_map(|o| o.etag.map(|etag| (o.key, etag)))
            .collect())
    }

    async fn upload(&self, bucket: &BucketName, upload: &Upload) -> Result<(), StoreError> {
        self.upload_file(bucket, upload)
            .await
            .map_err(|e| StoreError::new("upload", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_parts_for_empty_body() {
        assert!(plan_parts(0, 8).is_empty());
    }

    #[test]
    fn parts_cover_body_exactly() {
        let parts = plan_parts(20, 8);
        assert_eq!(
            parts,
            vec![
                PartSpec { number: 1, offset: 0, len: 8 },
                PartSpec { number: 2, offset: 8, len: 8 },
                PartSpec { number: 3, offset: 16, len: 4 },
            ]
        );
    }

    #[test]
    fn part_count_matches_fingerprint_suffix() {
        let chunk = 8 * 1024 * 1024;
        let data = vec![0u8; chunk as usize + 1];
        let fp = webotron_sync::fingerprint_reader(std::io::Cursor::new(&data), chunk)
            .unwrap()
            .unwrap();
        assert_eq!(plan_parts(data.len() as u64, chunk).len(), fp.part_count());
    }
}
