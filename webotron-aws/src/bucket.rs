//! Bucket provisioning: create, publish, and configure static hosting.

use aws_config::SdkConfig;
use aws_sdk_s3::primitives::DateTimeFormat;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, ErrorDocument, IndexDocument,
    WebsiteConfiguration,
};
use aws_sdk_s3::Client;
use webotron_core::{BucketName, PolicyDocument};

use crate::config::FALLBACK_REGION;
use crate::endpoints::{region_from_location, website_endpoint, WebsiteEndpoint};
use crate::error::{api_err, AwsError};

/// A bucket as listed by `ListBuckets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSummary {
    pub name: String,
    pub created: Option<String>,
}

/// S3 bucket-level operations. Holds no state beyond the client.
#[derive(Clone)]
pub struct BucketManager {
    client: Client,
    region: String,
}

impl BucketManager {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
            region: config
                .region()
                .map(|r| r.to_string())
                .unwrap_or_else(|| FALLBACK_REGION.to_string()),
        }
    }

    /// The region new buckets are created in.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Every bucket the caller owns.
    pub async fn all_buckets(&self) -> Result<Vec<BucketSummary>, AwsError> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(api_err("ListBuckets"))?;
        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| {
                b.name().map(|name| BucketSummary {
                    name: name.to_owned(),
                    created: b
                        .creation_date()
                        .and_then(|d| d.fmt(DateTimeFormat::DateTime).ok()),
                })
            })
            .collect())
    }

    /// Create `bucket` in the configured region, or adopt it if the caller
    /// already owns it. Any other failure is returned.
    pub async fn ensure_bucket_exists(&self, bucket: &BucketName) -> Result<(), AwsError> {
        let mut request = self.client.create_bucket().bucket(bucket.as_str());
        // us-east-1 rejects an explicit location constraint.
        if self.region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => {
                tracing::info!(bucket = %bucket, region = %self.region, "created bucket");
                Ok(())
            }
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_bucket_already_owned_by_you()) =>
            {
                tracing::info!(bucket = %bucket, "bucket already owned, reusing it");
                Ok(())
            }
            Err(e) => Err(api_err("CreateBucket")(e)),
        }
    }

    /// Attach a policy letting anyone read every object.
    pub async fn make_publicly_readable(&self, bucket: &BucketName) -> Result<(), AwsError> {
        let policy = PolicyDocument::public_read(bucket).to_json()?;
        self.client
            .put_bucket_policy()
            .bucket(bucket.as_str())
            .policy(policy)
            .send()
            .await
            .map_err(api_err("PutBucketPolicy"))?;
        tracing::info!(bucket = %bucket, "attached public read policy");
        Ok(())
    }

    /// Serve `bucket` as a static website.
    pub async fn enable_static_hosting(
        &self,
        bucket: &BucketName,
        index_document: &str,
        error_document: &str,
    ) -> Result<(), AwsError> {
        let index = IndexDocument::builder()
            .suffix(index_document)
            .build()
            .map_err(api_err("PutBucketWebsite"))?;
        let error = ErrorDocument::builder()
            .key(error_document)
            .build()
            .map_err(api_err("PutBucketWebsite"))?;
        self.client
            .put_bucket_website()
            .bucket(bucket.as_str())
            .website_configuration(
                WebsiteConfiguration::builder()
                    .index_document(index)
                    .error_document(error)
                    .build(),
            )
            .send()
            .await
            .map_err(api_err("PutBucketWebsite"))?;
        tracing::info!(bucket = %bucket, index_document, error_document, "enabled static hosting");
        Ok(())
    }

    /// The region `bucket` lives in.
    pub async fn bucket_region(&self, bucket: &BucketName) -> Result<String, AwsError> {
        let output = self
            .client
            .get_bucket_location()
            .bucket(bucket.as_str())
            .send()
            .await
            .map_err(api_err("GetBucketLocation"))?;
        let constraint = output.location_constraint().map(|c| c.as_str());
        Ok(region_from_location(constraint).to_owned())
    }

    /// The website endpoint serving `bucket`.
    pub async fn website_endpoint(&self, bucket: &BucketName) -> Result<WebsiteEndpoint, AwsError> {
        let region = self.bucket_region(bucket).await?;
        website_endpoint(&region).ok_or(AwsError::UnknownRegion(region))
    }

    /// `http://<bucket>.<website host>`
    pub async fn bucket_url(&self, bucket: &BucketName) -> Result<String, AwsError> {
        Ok(self.website_endpoint(bucket).await?.bucket_url(bucket))
    }
}
