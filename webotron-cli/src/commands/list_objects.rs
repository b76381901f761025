//! `webotron list-bucket-objects`

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use webotron_aws::store::RemoteObject;
use webotron_aws::S3Store;
use webotron_core::BucketName;

use super::AppContext;

/// Arguments for `webotron list-bucket-objects`.
#[derive(Args, Debug)]
pub struct ListObjectsArgs {
    /// Bucket to list.
    pub bucket: BucketName,

    /// Show a table with sizes and ETags.
    #[arg(long, conflicts_with = "json")]
    pub long: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Tabled)]
struct ObjectRow {
    key: String,
    size: i64,
    #[tabled(display_with = "display_etag")]
    etag: Option<String>,
}

fn display_etag(etag: &Option<String>) -> String {
    etag.clone().unwrap_or_default()
}

impl From<RemoteObject> for ObjectRow {
    fn from(o: RemoteObject) -> Self {
        Self {
            key: o.key,
            size: o.size,
            etag: o.etag,
        }
    }
}

impl ListObjectsArgs {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let sdk = ctx.sdk_config().await;
        let store = S3Store::new(&sdk, ctx.settings.chunk_size);
        let objects = store
            .list_objects(&self.bucket)
            .await
            .with_context(|| format!("failed to list objects in '{}'", self.bucket))?;
        let rows: Vec<ObjectRow> = objects.into_iter().map(ObjectRow::from).collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize objects")?
            );
        } else if self.long {
            if rows.is_empty() {
                println!("Bucket '{}' is empty.", self.bucket);
                return Ok(());
            }
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        } else {
            for row in rows {
                println!("{}", row.key);
            }
        }
        Ok(())
    }
}
