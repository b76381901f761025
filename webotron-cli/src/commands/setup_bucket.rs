//! `webotron setup-bucket`: create a bucket and publish it as a website.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use webotron_aws::{BucketManager, S3Store};
use webotron_core::{BucketName, ObjectKey};
use webotron_sync::Upload;

use super::AppContext;

/// Arguments for `webotron setup-bucket`.
#[derive(Args, Debug)]
pub struct SetupBucketArgs {
    /// Bucket to create (or reuse, if you already own it).
    pub bucket: BucketName,

    /// Local page uploaded as the site's index document.
    #[arg(long, default_value = "index.html")]
    pub index: PathBuf,
}

impl SetupBucketArgs {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let metadata = std::fs::metadata(&self.index)
            .with_context(|| format!("cannot read index page {}", self.index.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("index page {} is not a file", self.index.display());
        }

        let sdk = ctx.sdk_config().await;
        let buckets = BucketManager::new(&sdk);
        let store = S3Store::new(&sdk, ctx.settings.chunk_size);
        let index_document = &ctx.settings.index_document;
        let error_document = &ctx.settings.error_document;

        buckets
            .ensure_bucket_exists(&self.bucket)
            .await
            .with_context(|| format!("failed to create bucket '{}'", self.bucket))?;
        println!("{} bucket '{}' ready in {}", "✓".green(), self.bucket, buckets.region());

        let upload = Upload {
            key: ObjectKey::from(index_document.as_str()),
            path: self.index.clone(),
            size: metadata.len(),
            content_type: "text/html".to_string(),
        };
        store
            .upload_file(&self.bucket, &upload)
            .await
            .with_context(|| format!("failed to upload {}", self.index.display()))?;
        println!("{} uploaded {} as {}", "✓".green(), self.index.display(), upload.key);

        buckets
            .make_publicly_readable(&self.bucket)
            .await
            .with_context(|| format!("failed to attach public policy to '{}'", self.bucket))?;
        println!("{} public read policy attached", "✓".green());

        buckets
            .enable_static_hosting(&self.bucket, index_document, error_document)
            .await
            .with_context(|| format!("failed to enable website hosting on '{}'", self.bucket))?;
        println!(
            "{} static hosting enabled (index: {index_document}, error: {error_document})",
            "✓".green()
        );

        let url = buckets
            .bucket_url(&self.bucket)
            .await
            .with_context(|| format!("failed to resolve website URL for '{}'", self.bucket))?;
        println!("{url}");
        Ok(())
    }
}
