//! `webotron sync`: upload new and changed files to a bucket.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use webotron_aws::{BucketManager, S3Store};
use webotron_core::BucketName;
use webotron_sync::{resolve_root, CancellationToken, FileOutcome, SyncEngine, SyncOptions, SyncReport};

use super::AppContext;

/// Arguments for `webotron sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Local directory to publish.
    pub pathname: PathBuf,

    /// Destination bucket.
    pub bucket: BucketName,

    /// Report what would be uploaded without uploading anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        // Reject a bad root before touching the network.
        let root = resolve_root(&self.pathname)
            .with_context(|| format!("cannot sync {}", self.pathname.display()))?;

        let sdk = ctx.sdk_config().await;
        let store = S3Store::new(&sdk, ctx.settings.chunk_size);
        let options = SyncOptions {
            dry_run: self.dry_run,
            ..SyncOptions::from(&ctx.settings)
        };
        let engine = SyncEngine::new(Arc::new(store), options);

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, letting in-flight uploads finish");
                on_interrupt.cancel();
            }
        });

        let report = engine
            .run(&root, &self.bucket, &cancel)
            .await
            .with_context(|| format!("sync of {} to '{}' failed", root.display(), self.bucket))?;
        print_report(&report, self.dry_run);

        if !self.dry_run {
            match BucketManager::new(&sdk).bucket_url(&self.bucket).await {
                Ok(url) => println!("{url}"),
                Err(e) => tracing::warn!(error = %e, "could not resolve website URL"),
            }
        }

        let failed = report.failures().len();
        let cancelled = report.cancelled_count();
        if failed > 0 {
            anyhow::bail!("{failed} file(s) failed to upload");
        }
        if cancelled > 0 {
            anyhow::bail!("sync interrupted, {cancelled} file(s) not processed");
        }
        Ok(())
    }
}

fn print_report(report: &SyncReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Uploaded { key } => println!("  {} {key}", "Uploading".green()),
            FileOutcome::WouldUpload { key } => println!("  {} {key}", "Would upload".yellow()),
            FileOutcome::Skipped { key } => println!("  {} {key}", "Skipping".bright_black()),
            FileOutcome::Failed { key, error } => {
                println!("  {} {key}: {error}", "Failed".red().bold())
            }
            FileOutcome::Cancelled { key } => println!("  {} {key}", "Cancelled".magenta()),
        }
    }

    let (uploaded, skipped) = report.counts();
    let uploaded = if dry_run {
        report.would_upload_count()
    } else {
        uploaded
    };
    let verb = if dry_run { "to upload" } else { "uploaded" };
    let mark = if report.is_success() {
        "✓".green()
    } else {
        "✗".red()
    };
    let elapsed = (Utc::now() - report.started_at).num_milliseconds() as f64 / 1000.0;
    println!(
        "{prefix}{mark} {} → '{}' ({uploaded} {verb}, {skipped} unchanged) in {elapsed:.1}s",
        report.root.display(),
        report.bucket,
    );
}
